//!
//! TrainParams for a Baum-Welch step
//!

///
/// Tolerance of `|sum - 1|` (relative to 1) accepted for a distribution.
///
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

///
/// What to do with a sequence that has zero probability under the model
/// (the posterior cannot be normalized).
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroEvidencePolicy {
    /// abort the step with `HmmError::ZeroProbabilitySequence`
    Fail,
    /// drop the sequence from the step and continue
    Skip,
}

///
/// What to do when a row of the new model cannot be normalized because the
/// state has no expected count in the whole corpus
/// (never left for the transition table, never occupied for the emission table).
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnvisitedStatePolicy {
    /// keep the row of the current model
    KeepPrior,
    /// abort the step with `HmmError::UnvisitedState`
    Fail,
}

///
/// Parameters of one training step
///
#[derive(Debug, Clone, PartialEq)]
pub struct TrainParams {
    pub on_zero_evidence: ZeroEvidencePolicy,
    pub on_unvisited_state: UnvisitedStatePolicy,
    ///
    /// accumulate expected counts of sequences in parallel with rayon
    pub parallel: bool,
    ///
    /// tolerance used to validate the re-estimated model
    pub tolerance: f64,
}

impl TrainParams {
    pub fn new(
        on_zero_evidence: ZeroEvidencePolicy,
        on_unvisited_state: UnvisitedStatePolicy,
        parallel: bool,
    ) -> TrainParams {
        TrainParams {
            on_zero_evidence,
            on_unvisited_state,
            parallel,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
    /// Every degenerate case is an error
    pub fn strict() -> TrainParams {
        TrainParams::new(ZeroEvidencePolicy::Fail, UnvisitedStatePolicy::Fail, false)
    }
    /// Skip impossible sequences and keep rows of unvisited states
    pub fn lenient() -> TrainParams {
        TrainParams::new(ZeroEvidencePolicy::Skip, UnvisitedStatePolicy::KeepPrior, false)
    }
    /// Same params with parallel accumulation turned on/off
    pub fn parallel(self, parallel: bool) -> TrainParams {
        TrainParams { parallel, ..self }
    }
}

///
/// Fail on impossible sequences, keep rows of unvisited states,
/// sequential accumulation.
///
impl Default for TrainParams {
    fn default() -> Self {
        TrainParams::new(
            ZeroEvidencePolicy::Fail,
            UnvisitedStatePolicy::KeepPrior,
            false,
        )
    }
}

impl std::fmt::Display for TrainParams {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "on_zero_evidence={:?} on_unvisited_state={:?} parallel={} tolerance={}",
            self.on_zero_evidence, self.on_unvisited_state, self.parallel, self.tolerance
        )
    }
}
