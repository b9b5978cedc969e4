//! Next-candidate selection under loop or random policy.
//!
//! Stateless: callers pass the current position, the candidate count,
//! and the policy axes. All retry behavior (distinct resampling) is
//! bounded and internal - a `None` result means "no valid next
//! candidate", and callers must not retry indefinitely.

use rand::Rng;

use crate::policy::SelectionMode;

/// Compute the position of the next candidate.
///
/// Loop mode advances sequentially: `(current + 1) % count`, entering at
/// 0 when nothing is displayed. Random mode samples uniformly over
/// `[0, count)`; with `distinct` set and more than one candidate it
/// rejection-resamples until the result differs from `current` (expected
/// O(1) iterations - a valid alternative is guaranteed to exist).
///
/// Returns `None` when the set is empty, or when `distinct` is required
/// but the only possible result equals `current` (single-candidate set).
pub fn next_position<R: Rng + ?Sized>(
    current: Option<usize>,
    count: usize,
    mode: SelectionMode,
    distinct: bool,
    rng: &mut R,
) -> Option<usize> {
    match mode {
        SelectionMode::Loop => next_in_loop(current, count, distinct),
        SelectionMode::Random => next_random(current, count, distinct, rng),
    }
}

fn next_in_loop(
    current: Option<usize>,
    count: usize,
    distinct: bool,
) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let next = current.map_or(0, |i| (i + 1) % count);
    // Only possible when count == 1.
    if distinct && Some(next) == current {
        None
    } else {
        Some(next)
    }
}

fn next_random<R: Rng + ?Sized>(
    current: Option<usize>,
    count: usize,
    distinct: bool,
    rng: &mut R,
) -> Option<usize> {
    match count {
        0 => None,
        1 => {
            if distinct && current == Some(0) {
                None
            } else {
                Some(0)
            }
        }
        _ => {
            let mut next = rng.random_range(0..count);
            while distinct && Some(next) == current {
                next = rng.random_range(0..count);
            }
            Some(next)
        }
    }
}
