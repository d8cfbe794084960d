//!
//! Forward algorithm definitions
//!
use super::common::{StateProbs, Symbol};
use super::model::HmmModel;
use super::result::{check_time, ForwardResult};
use crate::error::Result;

// wrappers and exposed functions
impl<S: Symbol, O: Symbol> HmmModel<S, O> {
    ///
    /// Run Forward algorithm to the observations
    ///
    /// `alpha_t[k]` = P(emits `x[1],...,x[t]` and now in state `k`)
    ///
    pub fn forward(&self, observations: &[O]) -> Result<ForwardResult> {
        let emissions = self.encode(observations)?;
        Ok(self.forward_encoded(&emissions))
    }
    ///
    /// Calculate only alpha at time `t` (`1 <= t <= T`), by running the
    /// recursion on the prefix `x[1..=t]`.
    ///
    pub fn forward_at(&self, observations: &[O], time: usize) -> Result<StateProbs> {
        let emissions = self.encode(observations)?;
        check_time(time, emissions.len())?;
        let table = emissions[1..time]
            .iter()
            .fold(self.f_init(emissions[0]), |prev, &x| self.f_step(x, &prev));
        Ok(table)
    }
    ///
    /// Run Forward on encoded non-empty observations
    ///
    pub(crate) fn forward_encoded(&self, emissions: &[usize]) -> ForwardResult {
        let r0 = ForwardResult {
            tables: vec![self.f_init(emissions[0])],
        };
        emissions[1..].iter().fold(r0, |mut r, &x| {
            let table = self.f_step(x, r.last_table());
            r.tables.push(table);
            r
        })
    }
    ///
    /// alpha at `t=1`
    ///
    /// ```text
    /// alpha_1[k] = pi[k] e_k(x[1])
    /// ```
    fn f_init(&self, x: usize) -> StateProbs {
        (0..self.n_states())
            .map(|k| self.p_init(k) * self.p_emit(k, x))
            .collect()
    }
    ///
    /// Calculate alpha of the next time from the previous table
    ///
    /// ```text
    /// alpha_t[k] = e_k(x[t]) \sum_{l} alpha_t-1[l] a_lk
    /// ```
    fn f_step(&self, x: usize, prev: &StateProbs) -> StateProbs {
        (0..self.n_states())
            .map(|k| {
                let from_all: f64 = prev
                    .iter()
                    .enumerate()
                    .map(|(l, &f)| f * self.p_trans(l, k))
                    .sum();
                self.p_emit(k, x) * from_all
            })
            .collect()
    }
}

//
// Tests
//
