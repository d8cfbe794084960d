//!
//! Error type shared by the whole crate
//!
use thiserror::Error;

///
/// Failures of model construction, inference and training.
///
/// Symbols (states and observations) are carried as their `Debug` rendering
/// so that the error type does not depend on the symbol types of the model.
///
#[derive(Debug, Error)]
pub enum HmmError {
    #[error("{0} domain must have at least one element")]
    EmptyDomain(&'static str),
    #[error("{domain} {symbol} appears more than once")]
    DuplicateSymbol {
        domain: &'static str,
        symbol: String,
    },
    #[error("{domain} {symbol} is not in the model")]
    UnknownSymbol {
        domain: &'static str,
        symbol: String,
    },
    #[error("{table}[{row}] has invalid probability {value} for {target}")]
    InvalidProbability {
        table: &'static str,
        row: String,
        target: String,
        value: f64,
    },
    #[error("{table}[{row}] sums to {sum}, not 1")]
    MalformedDistribution {
        table: &'static str,
        row: String,
        sum: f64,
    },
    #[error("{what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("observation sequence is empty")]
    EmptySequence,
    #[error("time {time} is out of range [1, {max}]")]
    TimeOutOfRange { time: usize, max: usize },
    #[error("observation sequence has zero probability under the model")]
    ZeroProbability,
    #[error("sequence #{index} of the corpus has zero probability under the model")]
    ZeroProbabilitySequence { index: usize },
    #[error("training corpus is empty")]
    EmptyCorpus,
    #[error("every sequence of the corpus was skipped")]
    NoUsableSequence,
    #[error("state {state} has no expected {what} in the corpus")]
    UnvisitedState { state: String, what: &'static str },
    #[error("offset {0} is out of range [0, 1)")]
    OffsetOutOfRange(f64),
    #[error("no choices to select from")]
    EmptyChoices,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HmmError>;
