//!
//! Discrete HMM and Baum-Welch re-estimation
//!
//! # Overview of calculation
//!
//! x = x[1],...,x[T] : Observations of length T (times are 1-based)
//!
//! Forward
//! F[t][s]
//!  = P(emits x[1],...,x[t] and in state s at time t) for 1<=t<=T
//!
//! Backward
//! B[t][s]
//!  = P(emits x[t+1],...,x[T] | in state s at time t) for 1<=t<=T+1
//!  B[T+1][s] = 1 is the boundary.
//!
//! State occupation (gamma)
//! G[t][s]
//!  = P(in state s at time t | x)
//!  = F[t][s] B[t][s] / sum_s' F[t][s'] B[t][s']
//!
//! Transition pair occupation (xi), for 1<=t<=T-1
//! X[t][k][l]
//!  = P(in state k at t and in state l at t+1 | x)
//!  = F[t][k] a_kl e_l(x[t+1]) B[t+1][l] / (sum over all pairs)
//!
//! F and B are not rescaled, so they underflow to 0 on long sequences.
//! `logspace` has the same recursions on `Prob`.
//!
pub mod backward;
pub mod common;
pub mod forward;
pub mod freq;
pub mod logspace;
pub mod mocks;
pub mod model;
pub mod params;
pub mod posterior;
pub mod result;
pub mod sample;
pub mod table;
pub mod train;

pub use common::{Domain, StateProbs, Symbol};
pub use freq::ExpectedCounts;
pub use logspace::LogStateProbs;
pub use model::{HmmModel, HmmModelBuilder};
pub use params::{TrainParams, UnvisitedStatePolicy, ZeroEvidencePolicy, DEFAULT_TOLERANCE};
pub use result::{BackwardResult, ForwardResult, HmmOutput};
pub use sample::Sample;
pub use table::ProbTable;
