//!
//! One Baum-Welch (EM) re-estimation step
//!
//! E-step: run Forward/Backward on each sequence of the corpus and
//! accumulate `ExpectedCounts`.
//!
//! M-step: normalize the counts into a new model. For each state the
//! emission row is re-estimated before the transition row, so a state that
//! is never occupied is reported as such rather than as having no
//! transitions.
//!
//! ```text
//! pi[k]     = init[k] / (number of sequences)
//! a[k][l]   = trans[k][l] / trans_total[k]
//! e[k][o]   = emit[k][o] / occupation[k]
//! ```
//!
//! Iterating to convergence is left to the caller.
//!
use super::common::Symbol;
use super::freq::ExpectedCounts;
use super::model::HmmModel;
use super::params::{TrainParams, UnvisitedStatePolicy, ZeroEvidencePolicy};
use super::table::ProbTable;
use crate::error::{HmmError, Result};
use log::{debug, info, warn};
use rayon::prelude::*;

impl<S: Symbol, O: Symbol> HmmModel<S, O> {
    ///
    /// Run one Baum-Welch step with the default `TrainParams`
    /// and return the re-estimated model.
    ///
    pub fn train_one_step<T>(&self, corpus: &[T]) -> Result<HmmModel<S, O>>
    where
        T: AsRef<[O]> + Sync,
    {
        self.train_one_step_with(corpus, &TrainParams::default())
    }
    ///
    /// Run one Baum-Welch step and return the re-estimated model.
    ///
    pub fn train_one_step_with<T>(
        &self,
        corpus: &[T],
        params: &TrainParams,
    ) -> Result<HmmModel<S, O>>
    where
        T: AsRef<[O]> + Sync,
    {
        let counts = self.expected_counts(corpus, params)?;
        info!(
            "baum-welch step: n_used={} n_skipped={} log_prob={}",
            counts.n_used, counts.n_skipped, counts.log_prob
        );
        self.reestimate(&counts, params)
    }
    ///
    /// E-step: accumulate the expected counts of all sequences in the corpus.
    ///
    pub fn expected_counts<T>(&self, corpus: &[T], params: &TrainParams) -> Result<ExpectedCounts>
    where
        T: AsRef<[O]> + Sync,
    {
        if corpus.is_empty() {
            return Err(HmmError::EmptyCorpus);
        }
        let n = self.n_states();
        let m = self.n_observations();
        if params.parallel {
            corpus
                .par_iter()
                .enumerate()
                .map(|(i, seq)| self.sequence_counts(i, seq.as_ref(), params))
                .try_reduce(
                    || ExpectedCounts::new(n, m),
                    |mut a, b| {
                        a.merge(&b)?;
                        Ok(a)
                    },
                )
        } else {
            corpus
                .iter()
                .enumerate()
                .try_fold(ExpectedCounts::new(n, m), |mut a, (i, seq)| {
                    a.merge(&self.sequence_counts(i, seq.as_ref(), params)?)?;
                    Ok(a)
                })
        }
    }
    ///
    /// Expected counts of the `index`-th sequence of the corpus.
    ///
    /// Empty sequences and unknown observations always fail. Zero probability
    /// sequences fail or are skipped according to `params.on_zero_evidence`.
    ///
    fn sequence_counts(
        &self,
        index: usize,
        observations: &[O],
        params: &TrainParams,
    ) -> Result<ExpectedCounts> {
        let emissions = self.encode(observations)?;
        let output = self.run_encoded(emissions);
        match output.to_expected_counts(self) {
            Ok(counts) => {
                debug!(
                    "sequence #{} length={} log_prob={}",
                    index,
                    observations.len(),
                    counts.log_prob
                );
                Ok(counts)
            }
            Err(HmmError::ZeroProbability) => match params.on_zero_evidence {
                ZeroEvidencePolicy::Fail => Err(HmmError::ZeroProbabilitySequence { index }),
                ZeroEvidencePolicy::Skip => {
                    warn!("sequence #{} has zero probability, skipped", index);
                    Ok(ExpectedCounts::skipped(
                        self.n_states(),
                        self.n_observations(),
                    ))
                }
            },
            Err(e) => Err(e),
        }
    }
    ///
    /// M-step: normalize the expected counts into a new model.
    ///
    /// The initial distribution is averaged over the sequences that were
    /// actually used. Rows whose denominator is zero are handled according to
    /// `params.on_unvisited_state`.
    ///
    /// Fails with `HmmError::DimensionMismatch` if `counts` was not
    /// accumulated for a model of this shape.
    ///
    pub fn reestimate(
        &self,
        counts: &ExpectedCounts,
        params: &TrainParams,
    ) -> Result<HmmModel<S, O>> {
        let n = self.n_states();
        let m = self.n_observations();
        counts.check_shape(n, m)?;
        if counts.n_used == 0 {
            return Err(HmmError::NoUsableSequence);
        }

        let initial: Vec<f64> = counts
            .init
            .iter()
            .map(|c| c / counts.n_used as f64)
            .collect();

        let mut transition = ProbTable::zeros(n, n);
        let mut emission = ProbTable::zeros(n, m);
        for k in 0..n {
            self.normalize_row(
                emission.row_mut(k),
                counts.emit.row(k),
                counts.occupation[k],
                self.emission().row(k),
                k,
                "occupation",
                params,
            )?;
            self.normalize_row(
                transition.row_mut(k),
                counts.trans.row(k),
                counts.trans_total[k],
                self.transition().row(k),
                k,
                "transitions",
                params,
            )?;
        }

        HmmModel::from_parts(
            self.states().clone(),
            self.observations().clone(),
            initial,
            transition,
            emission,
            params.tolerance,
        )
    }
    ///
    /// Fill `dst` with `counts / total`, or with `prior` if the state `k` was
    /// never counted.
    ///
    #[allow(clippy::too_many_arguments)]
    fn normalize_row(
        &self,
        dst: &mut [f64],
        counts: &[f64],
        total: f64,
        prior: &[f64],
        k: usize,
        what: &'static str,
        params: &TrainParams,
    ) -> Result<()> {
        if total > 0.0 {
            for (d, c) in dst.iter_mut().zip(counts.iter()) {
                *d = c / total;
            }
            Ok(())
        } else {
            match params.on_unvisited_state {
                UnvisitedStatePolicy::KeepPrior => {
                    warn!(
                        "state {} has no expected {}, kept the current row",
                        self.states().label(k),
                        what
                    );
                    dst.copy_from_slice(prior);
                    Ok(())
                }
                UnvisitedStatePolicy::Fail => Err(HmmError::UnvisitedState {
                    state: self.states().label(k),
                    what,
                }),
            }
        }
    }
}

//
// Tests
//
