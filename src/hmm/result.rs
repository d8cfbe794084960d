//!
//! Forward/Backward result definitions
//!
//! * `ForwardResult`: alpha tables for `t = 1..=T`
//! * `BackwardResult`: beta tables for `t = 1..=T+1`
//! * `HmmOutput`: both of them and the encoded observations
//!
use super::common::{StateProbs, Symbol};
use super::model::HmmModel;
use crate::error::{HmmError, Result};

///
/// Check `1 <= time <= max`.
///
pub(crate) fn check_time(time: usize, max: usize) -> Result<()> {
    if time >= 1 && time <= max {
        Ok(())
    } else {
        Err(HmmError::TimeOutOfRange { time, max })
    }
}

/// Struct that stores Forward algorithm result
///
/// `tables[t-1]` is alpha at time `t`, so the length of tables
/// equals the length of observations.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardResult {
    pub(crate) tables: Vec<StateProbs>,
}

impl ForwardResult {
    /// The number of observations that this result stores.
    pub fn n_emissions(&self) -> usize {
        self.tables.len()
    }
    ///
    /// alpha at time `t` (`1 <= t <= T`)
    ///
    pub fn alpha(&self, time: usize) -> Result<&StateProbs> {
        check_time(time, self.n_emissions())?;
        Ok(&self.tables[time - 1])
    }
    /// alpha at time `T`
    pub fn last_table(&self) -> &StateProbs {
        &self.tables[self.tables.len() - 1]
    }
    ///
    /// `P(x) = sum_s alpha_T(s)`
    ///
    pub fn full_prob(&self) -> f64 {
        self.last_table().iter().sum()
    }
}

/// Struct that stores Backward algorithm result
///
/// `tables[t-1]` is beta at time `t`, and the last table is the boundary
/// at time `T+1`, so the length of tables is `T+1`.
#[derive(Debug, Clone, PartialEq)]
pub struct BackwardResult {
    pub(crate) tables: Vec<StateProbs>,
}

impl BackwardResult {
    /// The number of observations that this result stores.
    pub fn n_emissions(&self) -> usize {
        self.tables.len() - 1
    }
    ///
    /// beta at time `t` (`1 <= t <= T+1`)
    ///
    pub fn beta(&self, time: usize) -> Result<&StateProbs> {
        check_time(time, self.tables.len())?;
        Ok(&self.tables[time - 1])
    }
    /// beta at time `1`
    pub fn first_table(&self) -> &StateProbs {
        &self.tables[0]
    }
}

/// Struct for storing the results of forward and backward of a single
/// observation sequence (the observation context of posterior calculation).
///
/// It is created only by `HmmModel::run` and remembers the shape of that
/// model, so that methods taking a model reject one of another shape.
///
#[derive(Debug, Clone, PartialEq)]
pub struct HmmOutput {
    /// encoded observations, never empty
    pub(crate) emissions: Vec<usize>,
    /// the number of observations in the domain of the model
    pub(crate) n_observations: usize,
    /// result for forward run
    pub(crate) forward: ForwardResult,
    /// result for backward run
    pub(crate) backward: BackwardResult,
}

impl HmmOutput {
    pub(crate) fn new(
        emissions: Vec<usize>,
        n_observations: usize,
        forward: ForwardResult,
        backward: BackwardResult,
    ) -> Self {
        debug_assert_eq!(emissions.len(), forward.n_emissions());
        debug_assert_eq!(emissions.len(), backward.n_emissions());
        HmmOutput {
            emissions,
            n_observations,
            forward,
            backward,
        }
    }
    /// The length `T` of the observations
    pub fn n_emissions(&self) -> usize {
        self.emissions.len()
    }
    /// Encoded observations `x[1..=T]` as indices of the observation domain
    pub fn emissions(&self) -> &[usize] {
        &self.emissions
    }
    /// The number of hidden states of the model that produced this output
    pub fn n_states(&self) -> usize {
        self.forward.last_table().len()
    }
    pub fn forward(&self) -> &ForwardResult {
        &self.forward
    }
    pub fn backward(&self) -> &BackwardResult {
        &self.backward
    }
    ///
    /// Check that `model` has the same numbers of states and observations
    /// as the model that produced this output.
    ///
    pub fn check_model<S: Symbol, O: Symbol>(&self, model: &HmmModel<S, O>) -> Result<()> {
        if model.n_states() != self.n_states() {
            return Err(HmmError::DimensionMismatch {
                what: "model states",
                expected: self.n_states(),
                actual: model.n_states(),
            });
        }
        if model.n_observations() != self.n_observations {
            return Err(HmmError::DimensionMismatch {
                what: "model observations",
                expected: self.n_observations,
                actual: model.n_observations(),
            });
        }
        Ok(())
    }
    /// alpha at time `t`
    pub fn alpha(&self, time: usize) -> Result<&StateProbs> {
        self.forward.alpha(time)
    }
    /// beta at time `t`
    pub fn beta(&self, time: usize) -> Result<&StateProbs> {
        self.backward.beta(time)
    }
    /// Calculate the full probability `P(x)` of the observations
    /// from **forward** result.
    ///
    /// ```text
    /// P(x) = sum_s alpha_T(s)
    /// ```
    ///
    pub fn full_prob_forward(&self) -> f64 {
        self.forward.full_prob()
    }
    /// Calculate the full probability `P(x)` of the observations
    /// from **backward** result.
    ///
    /// ```text
    /// P(x) = sum_s pi(s) e(s, x[1]) beta_1(s)
    /// ```
    ///
    /// Fails if `model` does not have the shape of the model that produced
    /// this output.
    ///
    pub fn full_prob_backward<S: Symbol, O: Symbol>(&self, model: &HmmModel<S, O>) -> Result<f64> {
        self.check_model(model)?;
        let x = self.emissions[0];
        Ok(self
            .backward
            .first_table()
            .iter()
            .enumerate()
            .map(|(k, b)| model.p_init(k) * model.p_emit(k, x) * b)
            .sum())
    }
    ///
    /// `sum_s alpha_t(s) beta_t(s)`, which equals `P(x)` for every `1 <= t <= T`.
    ///
    pub fn full_prob_at(&self, time: usize) -> Result<f64> {
        let f = self.alpha(time)?;
        let b = self.beta(time)?;
        Ok(f.iter().zip(b.iter()).map(|(f, b)| f * b).sum())
    }
}

///
/// methods to generate HmmOutput from HmmModel
///
impl<S: Symbol, O: Symbol> HmmModel<S, O> {
    ///
    /// Run forward and backward for the observations and returns HmmOutput.
    ///
    pub fn run(&self, observations: &[O]) -> Result<HmmOutput> {
        let emissions = self.encode(observations)?;
        Ok(self.run_encoded(emissions))
    }
    ///
    /// Run forward and backward on encoded observations (non-empty).
    ///
    pub(crate) fn run_encoded(&self, emissions: Vec<usize>) -> HmmOutput {
        let forward = self.forward_encoded(&emissions);
        let backward = self.backward_encoded(&emissions);
        HmmOutput::new(emissions, self.n_observations(), forward, backward)
    }
}

//
// Tests
//
