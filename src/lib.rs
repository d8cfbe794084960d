//!
//! Discrete Hidden Markov Model and its parameter estimation by Baum-Welch
//!
//! * `hmm`: model, Forward/Backward, posteriors and re-estimation
//! * `prob`: probability in log space
//! * `io`: JSON files of models and corpora
//!
pub mod error;
pub mod hmm;
pub mod io;
pub mod prob;

pub use error::{HmmError, Result};

#[cfg(test)]
#[macro_use]
extern crate approx;
