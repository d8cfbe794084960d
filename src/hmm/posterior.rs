//!
//! Posterior probabilities of hidden states from the result of Forward/Backward.
//!
//! - **State occupation** (gamma, for each time and each state)
//!     The probability of being in the state at the time, given the whole
//!     observations.
//!
//! - **Transition pair occupation** (xi, for each time and each pair of states)
//!     The probability of being in the source state at the time and in the
//!     target state at the next time, given the whole observations.
//!
//! Both are normalized by the sum of their unnormalized weights. When that sum
//! is zero, the observations are impossible under the model and
//! `HmmError::ZeroProbability` is returned instead of NaN.
//!
use super::common::{StateProbs, Symbol};
use super::model::HmmModel;
use super::result::{check_time, HmmOutput};
use super::table::ProbTable;
use crate::error::{HmmError, Result};

///
/// Divide `values` by their total, failing if the total is zero.
///
fn normalize(values: &mut [f64]) -> Result<()> {
    let total: f64 = values.iter().sum();
    if total > 0.0 && total.is_finite() {
        for v in values.iter_mut() {
            *v /= total;
        }
        Ok(())
    } else {
        Err(HmmError::ZeroProbability)
    }
}

impl HmmOutput {
    /// Calculate gamma at time `t` (`1 <= t <= T`).
    ///
    /// ```text
    /// gamma_t[k]
    ///  = P(in state k at t | x)
    ///  = alpha_t[k] beta_t[k] / sum_l alpha_t[l] beta_t[l]
    /// ```
    ///
    pub fn state_occupation(&self, time: usize) -> Result<StateProbs> {
        let f = self.alpha(time)?;
        let b = self.beta(time)?;
        let mut g: StateProbs = f.iter().zip(b.iter()).map(|(f, b)| f * b).collect();
        normalize(&mut g)?;
        Ok(g)
    }
    /// Iterator of gamma for `t = 1..=T`
    pub fn iter_state_occupations(&self) -> impl Iterator<Item = Result<StateProbs>> + '_ {
        (1..=self.n_emissions()).map(move |t| self.state_occupation(t))
    }
    /// gamma for `t = 1..=T`, `ret[t-1]` is gamma at `t`.
    pub fn state_occupations(&self) -> Result<Vec<StateProbs>> {
        self.iter_state_occupations().collect()
    }
    /// Calculate xi at time `t` (`1 <= t <= T-1`).
    ///
    /// ```text
    /// xi_t[k][l]
    ///  = P(in state k at t and in state l at t+1 | x)
    ///  = alpha_t[k] a_kl e_l(x[t+1]) beta_t+1[l] / (sum over all pairs)
    /// ```
    ///
    /// A sequence of length 1 has no valid `t`. `model` must have the shape
    /// of the model that produced this output.
    ///
    pub fn transition_pair_occupation<S: Symbol, O: Symbol>(
        &self,
        model: &HmmModel<S, O>,
        time: usize,
    ) -> Result<ProbTable> {
        self.check_model(model)?;
        let n = self.n_emissions();
        check_time(time, n.saturating_sub(1))?;
        let f = self.alpha(time)?;
        let b = self.beta(time + 1)?;
        // x[t+1]
        let x = self.emissions[time];

        let n_states = model.n_states();
        let mut xi = ProbTable::zeros(n_states, n_states);
        for k in 0..n_states {
            for l in 0..n_states {
                xi[(k, l)] = f[k] * model.p_trans(k, l) * model.p_emit(l, x) * b[l];
            }
        }
        let total = xi.sum();
        if total > 0.0 && total.is_finite() {
            xi.scale(total);
            Ok(xi)
        } else {
            Err(HmmError::ZeroProbability)
        }
    }
}

impl<S: Symbol, O: Symbol> HmmModel<S, O> {
    ///
    /// Calculate gamma at time `t` without storing the whole tables,
    /// by recomputing alpha_t and beta_t from the observations.
    ///
    pub fn state_occupation(&self, observations: &[O], time: usize) -> Result<StateProbs> {
        let f = self.forward_at(observations, time)?;
        let b = self.backward_at(observations, time)?;
        let mut g: StateProbs = f.iter().zip(b.iter()).map(|(f, b)| f * b).collect();
        normalize(&mut g)?;
        Ok(g)
    }
}

//
// Tests
//
