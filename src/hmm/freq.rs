//!
//! Expected usage frequencies of hidden states and transitions
//! calculated from the result of Forward/Backward.
//!
//! - **Init freq** (for each state)
//!     The expected number of times the state is used at `t=1`.
//!
//! - **Trans freq** (for each pair of states)
//!     The expected number of transitions `k -> l`, summed over `t = 1..T-1`.
//!
//! - **Trans total** (for each state)
//!     The expected number of transitions away from `k`, summed over `t = 1..T-1`.
//!
//! - **Occupation** (for each state)
//!     The expected number of times the state is used, summed over `t = 1..T`.
//!
//! - **Emit freq** (for each state and each observation)
//!     The expected number of times the state emits the observation.
//!
//! Counts of multiple sequences are merged by elementwise addition, which is
//! associative and commutative so that they can be reduced in parallel.
//! Merging counts of different shapes is an error.
//!
use super::common::Symbol;
use super::model::HmmModel;
use super::result::HmmOutput;
use super::table::ProbTable;
use crate::error::{HmmError, Result};
use crate::prob::{p, Prob};

/// Accumulators of one Baum-Welch step
///
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectedCounts {
    /// `init[k]`: sum of gamma_1[k]
    pub init: Vec<f64>,
    /// `trans[(k, l)]`: sum of xi_t[k][l] for `t < T`
    pub trans: ProbTable,
    /// `trans_total[k]`: sum of gamma_t[k] for `t < T`
    pub trans_total: Vec<f64>,
    /// `occupation[k]`: sum of gamma_t[k] for `t <= T`
    pub occupation: Vec<f64>,
    /// `emit[(k, o)]`: sum of gamma_t[k] for `t <= T` with `x[t] = o`
    pub emit: ProbTable,
    /// number of sequences accumulated
    pub n_used: usize,
    /// number of sequences skipped because of zero probability
    pub n_skipped: usize,
    /// joint probability `prod P(x)` of the accumulated sequences
    pub log_prob: Prob,
}

impl ExpectedCounts {
    /// Empty accumulators
    pub fn new(n_states: usize, n_observations: usize) -> Self {
        ExpectedCounts {
            init: vec![0.0; n_states],
            trans: ProbTable::zeros(n_states, n_states),
            trans_total: vec![0.0; n_states],
            occupation: vec![0.0; n_states],
            emit: ProbTable::zeros(n_states, n_observations),
            n_used: 0,
            n_skipped: 0,
            log_prob: Prob::one(),
        }
    }
    /// Empty accumulators for a skipped sequence
    pub fn skipped(n_states: usize, n_observations: usize) -> Self {
        ExpectedCounts {
            n_skipped: 1,
            ..ExpectedCounts::new(n_states, n_observations)
        }
    }
    pub fn n_states(&self) -> usize {
        self.init.len()
    }
    pub fn n_observations(&self) -> usize {
        self.emit.n_cols()
    }
    ///
    /// Check that every accumulator is sized for `n_states` states and
    /// `n_observations` observations.
    ///
    pub fn check_shape(&self, n_states: usize, n_observations: usize) -> Result<()> {
        check_len("init counts", n_states, self.init.len())?;
        self.trans.check_shape("transition counts", n_states, n_states)?;
        check_len("transition totals", n_states, self.trans_total.len())?;
        check_len("occupation counts", n_states, self.occupation.len())?;
        self.emit
            .check_shape("emission counts", n_states, n_observations)?;
        Ok(())
    }
    ///
    /// Add the counts of `other` into `self`.
    ///
    /// Fails with `HmmError::DimensionMismatch`, leaving `self` unchanged,
    /// if `other` has another shape.
    ///
    pub fn merge(&mut self, other: &ExpectedCounts) -> Result<()> {
        other.check_shape(self.n_states(), self.n_observations())?;
        add_vec(&mut self.init, &other.init);
        self.trans.merge(&other.trans)?;
        add_vec(&mut self.trans_total, &other.trans_total);
        add_vec(&mut self.occupation, &other.occupation);
        self.emit.merge(&other.emit)?;
        self.n_used += other.n_used;
        self.n_skipped += other.n_skipped;
        self.log_prob *= other.log_prob;
        Ok(())
    }
}

fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(HmmError::DimensionMismatch {
            what,
            expected,
            actual,
        })
    }
}

/// lengths are checked by the caller
fn add_vec(a: &mut [f64], b: &[f64]) {
    for (x, y) in a.iter_mut().zip(b.iter()) {
        *x += y;
    }
}

impl HmmOutput {
    ///
    /// Calculate the expected counts of this single observation sequence.
    ///
    /// Fails with `HmmError::ZeroProbability` if the observations are
    /// impossible under the model, and with `HmmError::DimensionMismatch`
    /// if `model` is not of the shape of the model that produced this output.
    ///
    pub fn to_expected_counts<S: Symbol, O: Symbol>(
        &self,
        model: &HmmModel<S, O>,
    ) -> Result<ExpectedCounts> {
        self.check_model(model)?;
        let n_states = model.n_states();
        let n = self.n_emissions();
        let mut c = ExpectedCounts::new(n_states, model.n_observations());
        let gammas = self.state_occupations()?;

        // (1) at the beginning
        for (k, g) in gammas[0].iter().enumerate() {
            c.init[k] += g;
        }

        // (2) transitions, the last time has no next state
        for t in 1..n {
            let xi = self.transition_pair_occupation(model, t)?;
            c.trans.merge(&xi)?;
            add_vec(&mut c.trans_total, &gammas[t - 1]);
        }

        // (3) occupations and emissions for all times
        for (gamma, &x) in gammas.iter().zip(self.emissions.iter()) {
            for (k, g) in gamma.iter().enumerate() {
                c.occupation[k] += g;
                c.emit[(k, x)] += g;
            }
        }

        c.n_used = 1;
        c.log_prob = p(self.full_prob_forward());
        Ok(c)
    }
}

//
// Tests
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hmm::mocks::{mock_casino, mock_two_state, mock_two_state_without_y};

    #[test]
    fn expected_counts_two_state() {
        let model = mock_two_state();
        let o = model.run(&['x', 'y']).unwrap();
        let c = o.to_expected_counts(&model).unwrap();
        let g1 = o.state_occupation(1).unwrap();
        let g2 = o.state_occupation(2).unwrap();
        let xi = o.transition_pair_occupation(&model, 1).unwrap();

        assert_eq!(c.init, g1);
        assert_eq!(c.trans, xi);
        assert_eq!(c.trans_total, g1);
        for k in 0..2 {
            assert_abs_diff_eq!(c.occupation[k], g1[k] + g2[k], epsilon = 1e-15);
            // x at t=1, y at t=2
            assert_abs_diff_eq!(c.emit[(k, 0)], g1[k], epsilon = 1e-15);
            assert_abs_diff_eq!(c.emit[(k, 1)], g2[k], epsilon = 1e-15);
        }
        assert_eq!(c.n_used, 1);
        assert_abs_diff_eq!(c.log_prob.to_value(), 0.23, epsilon = 1e-12);
    }
    #[test]
    fn expected_counts_totals() {
        let model = mock_two_state();
        let xs = ['x', 'y', 'y', 'x', 'y', 'x', 'x'];
        let c = model.run(&xs).unwrap().to_expected_counts(&model).unwrap();
        assert_abs_diff_eq!(c.init.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.trans.sum(), 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.trans_total.iter().sum::<f64>(), 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.occupation.iter().sum::<f64>(), 7.0, epsilon = 1e-12);
        // 4 x's and 3 y's
        assert_abs_diff_eq!(c.emit[(0, 0)] + c.emit[(1, 0)], 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.emit[(0, 1)] + c.emit[(1, 1)], 3.0, epsilon = 1e-12);
    }
    #[test]
    fn expected_counts_single_observation_has_no_transitions() {
        let model = mock_two_state();
        let c = model.run(&['y']).unwrap().to_expected_counts(&model).unwrap();
        assert_eq!(c.trans.sum(), 0.0);
        assert_eq!(c.trans_total, vec![0.0, 0.0]);
        assert_abs_diff_eq!(c.occupation.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }
    #[test]
    fn expected_counts_merge() {
        let model = mock_two_state();
        let a = model.run(&['x', 'y']).unwrap().to_expected_counts(&model).unwrap();
        let b = model.run(&['y', 'y', 'x']).unwrap().to_expected_counts(&model).unwrap();
        let mut ab = a.clone();
        ab.merge(&b).unwrap();
        let mut ba = b.clone();
        ba.merge(&a).unwrap();
        assert_eq!(ab.n_used, 2);
        assert_abs_diff_eq!(
            ab.log_prob.to_log_value(),
            a.log_prob.to_log_value() + b.log_prob.to_log_value(),
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(ab.trans.max_abs_diff(&ba.trans), 0.0, epsilon = 1e-15);
        let mut e = ExpectedCounts::new(2, 2);
        e.merge(&ExpectedCounts::skipped(2, 2)).unwrap();
        e.merge(&a).unwrap();
        assert_eq!(e.n_skipped, 1);
        assert_eq!(e.n_used, 1);
        assert_eq!(e.init, a.init);
    }
    #[test]
    fn expected_counts_zero_probability() {
        let model = mock_two_state_without_y();
        let o = model.run(&['y']).unwrap();
        assert!(matches!(
            o.to_expected_counts(&model),
            Err(HmmError::ZeroProbability)
        ));
    }
    #[test]
    fn expected_counts_merge_rejects_other_shape() {
        let model = mock_two_state();
        let a = model.run(&['x', 'y']).unwrap().to_expected_counts(&model).unwrap();
        let mut c = a.clone();
        assert!(matches!(
            c.merge(&ExpectedCounts::new(3, 2)),
            Err(HmmError::DimensionMismatch {
                what: "init counts",
                expected: 2,
                actual: 3
            })
        ));
        assert!(matches!(
            c.merge(&ExpectedCounts::new(2, 6)),
            Err(HmmError::DimensionMismatch {
                what: "emission counts",
                expected: 2,
                actual: 6
            })
        ));
        // unchanged by the failed merges
        assert_eq!(c, a);
        assert!(c.check_shape(2, 2).is_ok());
        assert!(c.check_shape(2, 3).is_err());
    }
    #[test]
    fn expected_counts_rejects_model_of_other_shape() {
        let o = mock_casino().run(&[6, 6, 6]).unwrap();
        assert!(matches!(
            o.to_expected_counts(&mock_two_state()),
            Err(HmmError::DimensionMismatch { .. })
        ));
    }
}
