//!
//! Sampling hidden states and observations from the HmmModel
//!
pub mod picker;
use super::common::Symbol;
use super::model::HmmModel;
use crate::error::{HmmError, Result};
use picker::pick_with_rng;
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;

///
/// A sampled hidden state path and its observations
///
#[derive(Debug, Clone, PartialEq)]
pub struct Sample<S, O> {
    pub states: Vec<S>,
    pub observations: Vec<O>,
}

impl<S, O> Sample<S, O> {
    pub fn len(&self) -> usize {
        self.observations.len()
    }
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

impl<S: Symbol, O: Symbol> HmmModel<S, O> {
    ///
    /// Generate a state path of `length` and the emitted observations
    /// by running the model using `rng`.
    ///
    pub fn sample<R: Rng>(&self, length: usize, rng: &mut R) -> Result<Sample<S, O>> {
        if length == 0 {
            return Err(HmmError::EmptySequence);
        }
        let states = self.states().items();
        let observations = self.observations().items();
        let mut k = pick_with_rng(rng, &with_index(self.initial()))?;
        let mut sample = Sample {
            states: Vec::with_capacity(length),
            observations: Vec::with_capacity(length),
        };
        for t in 0..length {
            if t > 0 {
                k = pick_with_rng(rng, &with_index(self.transition().row(k)))?;
            }
            let o = pick_with_rng(rng, &with_index(self.emission().row(k)))?;
            sample.states.push(states[k].clone());
            sample.observations.push(observations[o].clone());
        }
        Ok(sample)
    }
    ///
    /// Generate `n` observation sequences of `length`.
    /// Random number generator will be created from the seed.
    ///
    pub fn sample_corpus(&self, n: usize, length: usize, seed: u64) -> Result<Vec<Vec<O>>> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        (0..n)
            .map(|_| Ok(self.sample(length, &mut rng)?.observations))
            .collect()
    }
}

/// `[(0, p0), (1, p1), ...]`
fn with_index(probs: &[f64]) -> Vec<(usize, f64)> {
    probs.iter().copied().enumerate().collect()
}

//
// Tests
//
