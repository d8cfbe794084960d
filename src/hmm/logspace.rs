//!
//! Forward/Backward in log space
//!
//! The recursions of `forward` and `backward` are unscaled and underflow to 0
//! on long sequences. This variant stores every value as `Prob` (`ln p`) and
//! sums with logaddexp, so that the log-likelihood of a long sequence stays
//! finite.
//!
//! It is used for reporting likelihoods only. Re-estimation uses the
//! unscaled tables.
//!
use super::common::{StateProbs, Symbol};
use super::model::HmmModel;
use super::result::check_time;
use crate::error::{HmmError, Result};
use crate::prob::{p, Prob};

/// Table of log probabilities for each state
pub type LogStateProbs = Vec<Prob>;

impl<S: Symbol, O: Symbol> HmmModel<S, O> {
    ///
    /// Run Forward in log space. `ret[t-1]` is `ln alpha_t`.
    ///
    pub fn forward_log(&self, observations: &[O]) -> Result<Vec<LogStateProbs>> {
        let emissions = self.encode(observations)?;
        let n_states = self.n_states();
        let mut tables: Vec<LogStateProbs> = Vec::with_capacity(emissions.len());
        tables.push(
            (0..n_states)
                .map(|k| p(self.p_init(k)) * p(self.p_emit(k, emissions[0])))
                .collect(),
        );
        for &x in emissions[1..].iter() {
            let prev = &tables[tables.len() - 1];
            let table: LogStateProbs = (0..n_states)
                .map(|k| {
                    let from_all: Prob = prev
                        .iter()
                        .enumerate()
                        .map(|(l, &f)| f * p(self.p_trans(l, k)))
                        .sum();
                    p(self.p_emit(k, x)) * from_all
                })
                .collect();
            tables.push(table);
        }
        Ok(tables)
    }
    ///
    /// Run Backward in log space. `ret[t-1]` is `ln beta_t` for `1 <= t <= T+1`.
    ///
    pub fn backward_log(&self, observations: &[O]) -> Result<Vec<LogStateProbs>> {
        let emissions = self.encode(observations)?;
        let n = emissions.len();
        let n_states = self.n_states();
        let mut tables: Vec<LogStateProbs> = Vec::with_capacity(n + 1);
        // ln beta_{T+1} = ln beta_T = 0
        tables.push(vec![Prob::one(); n_states]);
        tables.push(vec![Prob::one(); n_states]);
        for t in (1..n).rev() {
            let next = &tables[tables.len() - 1];
            let x = emissions[t];
            let table: LogStateProbs = (0..n_states)
                .map(|k| {
                    next.iter()
                        .enumerate()
                        .map(|(l, &b)| p(self.p_trans(k, l)) * p(self.p_emit(l, x)) * b)
                        .sum::<Prob>()
                })
                .collect();
            tables.push(table);
        }
        tables.reverse();
        Ok(tables)
    }
    ///
    /// `P(x)` of the observations as `Prob`, i.e. `sum_k alpha_T[k]` in log space.
    ///
    pub fn log_likelihood(&self, observations: &[O]) -> Result<Prob> {
        let tables = self.forward_log(observations)?;
        Ok(tables
            .last()
            .map(|last| last.iter().sum())
            .unwrap_or_else(Prob::zero))
    }
    ///
    /// `P(x)` of each sequence in the corpus.
    ///
    pub fn sequence_likelihoods<T: AsRef<[O]>>(&self, corpus: &[T]) -> Result<Vec<Prob>> {
        corpus
            .iter()
            .map(|seq| self.log_likelihood(seq.as_ref()))
            .collect()
    }
    ///
    /// Joint probability of the corpus `prod_s P(x^s)`, i.e. the sum of
    /// `ln P(x^s)` in log space.
    ///
    /// It is zero if any sequence is impossible under the model.
    ///
    pub fn corpus_log_likelihood<T: AsRef<[O]>>(&self, corpus: &[T]) -> Result<Prob> {
        if corpus.is_empty() {
            return Err(HmmError::EmptyCorpus);
        }
        Ok(self.sequence_likelihoods(corpus)?.iter().product())
    }
    ///
    /// Calculate gamma at time `t` from the log-space tables.
    ///
    /// Unlike `state_occupation`, it does not lose precision on long sequences.
    ///
    pub fn state_occupation_log(&self, observations: &[O], time: usize) -> Result<StateProbs> {
        let f = self.forward_log(observations)?;
        check_time(time, f.len())?;
        let b = self.backward_log(observations)?;
        let w: LogStateProbs = f[time - 1]
            .iter()
            .zip(b[time - 1].iter())
            .map(|(&f, &b)| f * b)
            .collect();
        let total: Prob = w.iter().sum();
        if total.is_zero() {
            return Err(HmmError::ZeroProbability);
        }
        Ok(w.into_iter().map(|w| (w / total).to_value()).collect())
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
    fn logspace_matches_unscaled() {
        let model = mock_casino();
        let xs = [3, 6, 6, 1, 6, 6, 2, 5, 6, 6];
        let f = model.forward(&xs).unwrap();
        let b = model.backward(&xs).unwrap();
        let fl = model.forward_log(&xs).unwrap();
        let bl = model.backward_log(&xs).unwrap();
        assert_eq!(fl.len(), xs.len());
        assert_eq!(bl.len(), xs.len() + 1);
        for t in 1..=xs.len() {
            for k in 0..model.n_states() {
                assert_relative_eq!(
                    fl[t - 1][k].to_value(),
                    f.alpha(t).unwrap()[k],
                    max_relative = 1e-10
                );
                assert_relative_eq!(
                    bl[t - 1][k].to_value(),
                    b.beta(t).unwrap()[k],
                    max_relative = 1e-10
                );
            }
        }
        // boundaries at T and T+1 are exactly ln 1 = 0
        for t in [xs.len() - 1, xs.len()] {
            assert!(bl[t].iter().all(|b| b.to_log_value() == 0.0));
        }
        assert_relative_eq!(
            model.log_likelihood(&xs).unwrap().to_value(),
            f.full_prob(),
            max_relative = 1e-10
        );
        for t in 1..=xs.len() {
            let a = model.state_occupation_log(&xs, t).unwrap();
            let b = model.state_occupation(&xs, t).unwrap();
            for k in 0..model.n_states() {
                assert_abs_diff_eq!(a[k], b[k], epsilon = 1e-10);
            }
        }
    }
    #[test]
    fn logspace_two_state_likelihood() {
        let model = mock_two_state();
        let lp = model.log_likelihood(&['x', 'y']).unwrap();
        assert_abs_diff_eq!(lp.to_log_value(), 0.23f64.ln(), epsilon = 1e-12);
        let total = model
            .corpus_log_likelihood(&[vec!['x', 'y'], vec!['x', 'y']])
            .unwrap();
        assert_abs_diff_eq!(total.to_log_value(), 2.0 * 0.23f64.ln(), epsilon = 1e-12);
        let each = model
            .sequence_likelihoods(&[vec!['x', 'y'], vec!['x']])
            .unwrap();
        assert_eq!(each.len(), 2);
        assert_abs_diff_eq!(each[1].to_value(), 0.55, epsilon = 1e-12);
        let empty: Vec<Vec<char>> = vec![];
        assert!(model.corpus_log_likelihood(&empty).is_err());
    }
    #[test]
    fn logspace_long_sequence_stays_finite() {
        let model = mock_casino();
        let xs: Vec<u8> = (0..5000).map(|i| (i % 6) as u8 + 1).collect();
        // unscaled forward underflows
        assert_eq!(model.forward(&xs).unwrap().full_prob(), 0.0);
        let lp = model.log_likelihood(&xs).unwrap();
        assert!(lp.to_log_value().is_finite());
        assert!(lp.to_log_value() < -5000.0);
        let g = model.state_occupation_log(&xs, 2500).unwrap();
        assert_abs_diff_eq!(g.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
    }
    #[test]
    fn logspace_zero_probability() {
        let model = mock_two_state_without_y();
        assert!(model.log_likelihood(&['x', 'y']).unwrap().is_zero());
        assert!(model
            .corpus_log_likelihood(&[vec!['x'], vec!['y']])
            .unwrap()
            .is_zero());
        assert!(matches!(
            model.state_occupation_log(&['y'], 1),
            Err(HmmError::ZeroProbability)
        ));
        assert!(matches!(
            model.state_occupation_log(&['x'], 2),
            Err(HmmError::TimeOutOfRange { .. })
        ));
    }
}
