//!
//! Weighted random selection from a finite distribution
//!
use crate::error::{HmmError, Result};
use rand::prelude::*;

///
/// Select the item whose cumulative interval `[lo, hi)` contains `offset`.
///
/// `choices` is an ordered list of `(item, probability)` covering a full
/// distribution. Items with probability 0 have an empty interval and are
/// never selected.
///
/// * `offset` outside `[0, 1)` is `HmmError::OffsetOutOfRange`
/// * empty `choices` is `HmmError::EmptyChoices`
/// * if `offset` is beyond the last bound because of rounding, the last item
///   with nonzero probability is selected.
///
pub fn select_at_offset<T: Clone>(choices: &[(T, f64)], offset: f64) -> Result<T> {
    if choices.is_empty() {
        return Err(HmmError::EmptyChoices);
    }
    if !(0.0..1.0).contains(&offset) {
        return Err(HmmError::OffsetOutOfRange(offset));
    }
    let mut hi = 0.0;
    for (item, p) in choices.iter() {
        hi += p;
        if *p > 0.0 && offset < hi {
            return Ok(item.clone());
        }
    }
    choices
        .iter()
        .rev()
        .find(|(_, p)| *p > 0.0)
        .map(|(item, _)| item.clone())
        .ok_or(HmmError::EmptyChoices)
}

///
/// Pick randomly from the choices with its own probability,
/// by drawing a uniform offset in `[0, 1)` from `rng`.
///
pub fn pick_with_rng<R: Rng, T: Clone>(rng: &mut R, choices: &[(T, f64)]) -> Result<T> {
    let offset: f64 = rng.gen();
    select_at_offset(choices, offset)
}
