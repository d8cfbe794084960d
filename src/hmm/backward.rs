//!
//! Backward algorithm definitions
//!
use super::common::{StateProbs, Symbol};
use super::model::HmmModel;
use super::result::{check_time, BackwardResult};
use crate::error::Result;

// wrappers and exposed functions
impl<S: Symbol, O: Symbol> HmmModel<S, O> {
    ///
    /// Run Backward algorithm to the observations
    ///
    /// `beta_t[k]` = P(emits `x[t+1],...,x[T]` | now in state `k`)
    ///
    pub fn backward(&self, observations: &[O]) -> Result<BackwardResult> {
        let emissions = self.encode(observations)?;
        Ok(self.backward_encoded(&emissions))
    }
    ///
    /// Calculate only beta at time `t` (`1 <= t <= T+1`), by iterating time
    /// backward from the boundary `T` down to `t`.
    ///
    pub fn backward_at(&self, observations: &[O], time: usize) -> Result<StateProbs> {
        let emissions = self.encode(observations)?;
        let n = emissions.len();
        check_time(time, n + 1)?;
        let table = (time..n)
            .rev()
            .fold(self.b_init(), |next, t| self.b_step(emissions[t], &next));
        Ok(table)
    }
    ///
    /// Run Backward on encoded non-empty observations
    ///
    pub(crate) fn backward_encoded(&self, emissions: &[usize]) -> BackwardResult {
        let n = emissions.len();
        // tables in reverse order (t = T+1, T, ..., 1)
        let mut tables = Vec::with_capacity(n + 1);
        tables.push(self.b_init());
        tables.push(self.b_init());
        for t in (1..n).rev() {
            // x[t+1] is emissions[t]
            let table = self.b_step(emissions[t], &tables[tables.len() - 1]);
            tables.push(table);
        }
        tables.reverse();
        BackwardResult { tables }
    }
    ///
    /// Boundary at `t=T` and `t=T+1`
    ///
    /// ```text
    /// beta_T[k] = beta_T+1[k] = 1
    /// ```
    fn b_init(&self) -> StateProbs {
        vec![1.0; self.n_states()]
    }
    ///
    /// Calculate beta of the previous time from the next table.
    ///
    /// ```text
    /// beta_t[k] = \sum_{l} a_kl e_l(x[t+1]) beta_t+1[l]
    /// ```
    ///
    /// Only used for `t < T`; `beta_T` is the boundary.
    fn b_step(&self, emission: usize, next: &StateProbs) -> StateProbs {
        (0..self.n_states())
            .map(|k| {
                next.iter()
                    .enumerate()
                    .map(|(l, &b)| self.p_trans(k, l) * self.p_emit(l, emission) * b)
                    .sum()
            })
            .collect()
    }
}

//
// Tests
//
