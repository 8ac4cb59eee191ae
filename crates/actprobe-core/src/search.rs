#![forbid(unsafe_code)]

//! Exact-match binary search over an ascending timestamp column.
//!
//! All searches report a hit only on exact equality; there is no
//! insertion-point fallback. A miss is `None`.
//!
//! The input must be sorted ascending. Log buffers spanning more than one
//! detector session are not, and searching them gives unspecified (but
//! memory-safe) results.

/// Classic binary search for one exact value.
///
/// Returns the index of the first midpoint equal to `target` encountered by
/// the halving process. With duplicate values this is not necessarily the
/// first or last occurrence.
pub fn find_one(values: &[u64], target: u64) -> Option<usize> {
    let mut left = 0usize;
    let mut right = values.len();

    // Half-open [left, right) so the cursors never underflow; `mid` is the
    // lower middle, same probe order as the closed-interval formulation.
    while left < right {
        let mid = left + (right - left - 1) / 2;
        let value = values[mid];
        if value == target {
            return Some(mid);
        }
        if value < target {
            left = mid + 1;
        } else {
            right = mid;
        }
    }
    None
}

/// Locate two exact values with two independent searches.
///
/// Returns `(index_of(first), index_of(second))`. This is what range queries
/// use; each target is found whenever [`find_one`] would find it.
pub fn find_pair(values: &[u64], first: u64, second: u64) -> (Option<usize>, Option<usize>) {
    (find_one(values, first), find_one(values, second))
}

/// Locate two exact values in a single halving pass over shared cursors.
///
/// When the probed midpoint matches either outstanding target, that slot is
/// recorded and its target is replaced by the other slot's target, so the
/// one cursor pair keeps hunting for whatever remains. The pass stops once
/// both slots are filled or the interval is exhausted.
///
/// This is a heuristic: after the first hit the interval has already been
/// narrowed toward that hit, so the second target can fall outside it and be
/// reported missing even though it is present. A hit on the first slot also
/// leaves that slot hunting the second value, so a later hit overwrites it.
/// Both slots fill only when the second target is met before the first.
/// For `[1, 3, 5, 7, 9]` and `(3, 7)` the result is `(Some(1), None)`.
/// Prefer [`find_pair`] unless the single-pass probe count matters more than
/// completeness.
pub fn find_pair_single_pass(
    values: &[u64],
    mut first: u64,
    mut second: u64,
) -> (Option<usize>, Option<usize>) {
    let mut first_index = None;
    let mut second_index = None;
    let mut left = 0usize;
    let mut right = values.len();

    while left < right {
        let mid = left + (right - left - 1) / 2;
        let value = values[mid];

        if value == first {
            first_index = Some(mid);
            if second_index.is_some() {
                break;
            }
            first = second;
        } else if value == second {
            second_index = Some(mid);
            if first_index.is_some() {
                break;
            }
            second = first;
        }

        // Steering always follows the (possibly reassigned) first target.
        if value < first {
            left = mid + 1;
        } else {
            right = mid;
        }
    }

    (first_index, second_index)
}
