#![no_main]

use actprobe_core::{InputEvent, LogBuffer, classify};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Move { x: i32, y: i32 },
    Click { x: i32, y: i32 },
    Key(u8),
    Wheel { dy: i16 },
    Focus,
    Other,
    Clear,
    Wait(u16),
    PreTime(Option<u16>),
    Range(Option<u16>, Option<u16>),
}

#[derive(Debug, Arbitrary)]
struct Input {
    capacity: u8,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let capacity = usize::from(input.capacity.max(1));
    let mut log = LogBuffer::new(capacity);
    let mut prev = None;
    let mut now: u64 = 0;

    for op in input.ops {
        let event = match op {
            Op::Move { x, y } => InputEvent::pointer_move(x, y),
            Op::Click { x, y } => InputEvent::click(x, y),
            Op::Key(code) => InputEvent::key(char::from(code).to_string()),
            Op::Wheel { dy } => InputEvent::wheel(0.0, f64::from(dy)),
            Op::Focus => InputEvent::Focus,
            Op::Other => InputEvent::Other("scroll".into()),
            Op::Clear => {
                log.clear();
                continue;
            }
            Op::Wait(dt) => {
                now = now.saturating_add(u64::from(dt));
                continue;
            }
            Op::PreTime(window) => {
                let hits = log.since_last(window.map(u64::from));
                assert!(hits.len() <= log.len());
                continue;
            }
            Op::Range(start, end) => {
                let hits = log.range(start.map(u64::from), end.map(u64::from));
                assert!(hits.len() <= log.len());
                continue;
            }
        };

        if let Some(entry) = classify(&event, prev.as_ref(), now) {
            log.push(entry.clone());
            prev = Some(entry);
        }

        // Post-conditions that must always hold:
        assert!(log.len() <= capacity, "capacity exceeded");
        let stamps = log.timestamps();
        assert!(
            stamps.windows(2).all(|w| w[0] <= w[1]),
            "timestamps out of order"
        );
        if let Some(entry) = log.last() {
            assert_eq!(Some(entry), prev.as_ref(), "last entry is not the previous entry");
        }
    }
});
