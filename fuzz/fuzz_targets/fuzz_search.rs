#![no_main]

use actprobe_core::search::{find_one, find_pair, find_pair_single_pass};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (Vec<u16>, u16, u16)| {
    let (mut values, a, b) = input;
    values.sort_unstable();
    let values: Vec<u64> = values.into_iter().map(u64::from).collect();
    let (a, b) = (u64::from(a), u64::from(b));

    let found = find_one(&values, a);
    assert_eq!(found.is_some(), values.contains(&a));
    if let Some(index) = found {
        assert_eq!(values[index], a);
    }

    let (first, second) = find_pair(&values, a, b);
    assert_eq!(first, find_one(&values, a));
    assert_eq!(second, find_one(&values, b));

    // The single pass may miss bounds or fill a slot with the other target,
    // but every hit points at one of them, and two hits are in order.
    let (first, second) = find_pair_single_pass(&values, a, b);
    for index in [first, second].into_iter().flatten() {
        assert!(values[index] == a || values[index] == b);
    }
    if let (Some(i), Some(j)) = (first, second) {
        assert_eq!((values[i], values[j]), (a, b));
    }
});
