//!
//! Definition of discrete HMM
//!
//! A model is a tuple of
//!
//! * `states`: domain of hidden states
//! * `observations`: domain of observations
//! * `initial[k]`: probability of starting in state `k`
//! * `transition[(k, l)]`: probability of moving from state `k` to state `l`
//! * `emission[(k, o)]`: probability of emitting observation `o` in state `k`
//!
//! It is validated on construction and never mutated afterwards.
//! Re-estimation creates a new model.
//!
use super::common::{Domain, StateProbs, Symbol};
use super::params::DEFAULT_TOLERANCE;
use super::table::ProbTable;
use crate::error::{HmmError, Result};

/// Discrete HMM model
///
#[derive(Debug, Clone, PartialEq)]
pub struct HmmModel<S: Symbol, O: Symbol> {
    states: Domain<S>,
    observations: Domain<O>,
    initial: StateProbs,
    transition: ProbTable,
    emission: ProbTable,
}

impl<S: Symbol, O: Symbol> HmmModel<S, O> {
    ///
    /// Create a model from dense rows, ordered as `states` and `observations`.
    ///
    /// * `transition[k][l]` is the probability of `states[k] -> states[l]`
    /// * `emission[k][o]` is the probability of `states[k]` emitting `observations[o]`
    ///
    pub fn new(
        states: Vec<S>,
        observations: Vec<O>,
        initial: Vec<f64>,
        transition: Vec<Vec<f64>>,
        emission: Vec<Vec<f64>>,
    ) -> Result<Self> {
        let states = Domain::new("state", states)?;
        let observations = Domain::new("observation", observations)?;
        let n = states.len();
        let m = observations.len();
        check_len("transition rows", n, transition.len())?;
        check_len("emission rows", n, emission.len())?;
        for row in transition.iter() {
            check_len("transition columns", n, row.len())?;
        }
        for row in emission.iter() {
            check_len("emission columns", m, row.len())?;
        }
        // shapes are checked above
        let transition = ProbTable::from_rows(transition, n).ok_or(HmmError::DimensionMismatch {
            what: "transition columns",
            expected: n,
            actual: 0,
        })?;
        let emission = ProbTable::from_rows(emission, m).ok_or(HmmError::DimensionMismatch {
            what: "emission columns",
            expected: m,
            actual: 0,
        })?;
        HmmModel::from_parts(
            states,
            observations,
            initial,
            transition,
            emission,
            DEFAULT_TOLERANCE,
        )
    }
    ///
    /// Start building a model by specifying each probability by symbols.
    ///
    pub fn builder(states: Vec<S>, observations: Vec<O>) -> HmmModelBuilder<S, O> {
        HmmModelBuilder::new(states, observations)
    }
    ///
    /// Assemble and validate a model from its parts.
    ///
    pub(crate) fn from_parts(
        states: Domain<S>,
        observations: Domain<O>,
        initial: StateProbs,
        transition: ProbTable,
        emission: ProbTable,
        tolerance: f64,
    ) -> Result<Self> {
        let model = HmmModel {
            states,
            observations,
            initial,
            transition,
            emission,
        };
        model.validate(tolerance)?;
        Ok(model)
    }
    ///
    /// Check that every distribution of the model is well-formed, i.e.
    /// all probabilities are finite in `[0, 1]` and sum to 1 within `tolerance`.
    ///
    pub fn validate(&self, tolerance: f64) -> Result<()> {
        let n = self.n_states();
        let m = self.n_observations();
        check_len("initial", n, self.initial.len())?;
        check_len("transition rows", n, self.transition.n_rows())?;
        check_len("transition columns", n, self.transition.n_cols())?;
        check_len("emission rows", n, self.emission.n_rows())?;
        check_len("emission columns", m, self.emission.n_cols())?;

        check_distribution(&self.initial, tolerance, "initial", "-", |l| {
            self.states.label(l)
        })?;
        for k in 0..n {
            let row = self.states.label(k);
            check_distribution(self.transition.row(k), tolerance, "transition", &row, |l| {
                self.states.label(l)
            })?;
            check_distribution(self.emission.row(k), tolerance, "emission", &row, |o| {
                self.observations.label(o)
            })?;
        }
        Ok(())
    }

    //
    // accessors
    //

    pub fn states(&self) -> &Domain<S> {
        &self.states
    }
    pub fn observations(&self) -> &Domain<O> {
        &self.observations
    }
    pub fn n_states(&self) -> usize {
        self.states.len()
    }
    pub fn n_observations(&self) -> usize {
        self.observations.len()
    }
    pub fn initial(&self) -> &[f64] {
        &self.initial
    }
    pub fn transition(&self) -> &ProbTable {
        &self.transition
    }
    pub fn emission(&self) -> &ProbTable {
        &self.emission
    }
    /// Initial probability of state index `k`
    #[inline]
    pub fn p_init(&self, k: usize) -> f64 {
        self.initial[k]
    }
    /// Transition probability of state index `k -> l`
    #[inline]
    pub fn p_trans(&self, k: usize, l: usize) -> f64 {
        self.transition[(k, l)]
    }
    /// Emission probability of observation index `o` from state index `k`
    #[inline]
    pub fn p_emit(&self, k: usize, o: usize) -> f64 {
        self.emission[(k, o)]
    }
    ///
    /// Initial probability of the state
    ///
    pub fn initial_prob(&self, state: &S) -> Result<f64> {
        Ok(self.p_init(self.states.index_of(state)?))
    }
    ///
    /// Transition probability `source -> target`
    ///
    pub fn transition_prob(&self, source: &S, target: &S) -> Result<f64> {
        let k = self.states.index_of(source)?;
        let l = self.states.index_of(target)?;
        Ok(self.p_trans(k, l))
    }
    ///
    /// Emission probability of `observation` from `state`
    ///
    pub fn emission_prob(&self, state: &S, observation: &O) -> Result<f64> {
        let k = self.states.index_of(state)?;
        let o = self.observations.index_of(observation)?;
        Ok(self.p_emit(k, o))
    }
    ///
    /// Convert an observation sequence into observation indices.
    ///
    /// Fails if the sequence is empty or has an observation outside the domain.
    ///
    pub fn encode(&self, observations: &[O]) -> Result<Vec<usize>> {
        if observations.is_empty() {
            return Err(HmmError::EmptySequence);
        }
        self.observations.encode(observations)
    }
    ///
    /// Pair the values of `StateProbs` with their states
    ///
    pub fn label_states<'a>(
        &'a self,
        probs: &'a [f64],
    ) -> impl Iterator<Item = (&'a S, f64)> + 'a {
        self.states.items().iter().zip(probs.iter().copied())
    }
    ///
    /// Largest absolute difference of any parameter between two models
    /// on the same domains.
    ///
    pub fn max_param_diff(&self, other: &HmmModel<S, O>) -> f64 {
        let d_init = self
            .initial
            .iter()
            .zip(other.initial.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        d_init
            .max(self.transition.max_abs_diff(&other.transition))
            .max(self.emission.max_abs_diff(&other.emission))
    }
}

impl<S, O> std::fmt::Display for HmmModel<S, O>
where
    S: Symbol,
    O: Symbol,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "states: {:?}", self.states.items())?;
        writeln!(f, "observations: {:?}", self.observations.items())?;
        writeln!(f, "initial: {:?}", self.initial)?;
        writeln!(f, "transition:")?;
        write!(f, "{}", self.transition)?;
        writeln!(f, "emission:")?;
        write!(f, "{}", self.emission)
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

///
/// Validate a single distribution `values` (a row of `table`).
///
fn check_distribution<F>(
    values: &[f64],
    tolerance: f64,
    table: &'static str,
    row: &str,
    target_label: F,
) -> Result<()>
where
    F: Fn(usize) -> String,
{
    for (i, &value) in values.iter().enumerate() {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(HmmError::InvalidProbability {
                table,
                row: row.to_string(),
                target: target_label(i),
                value,
            });
        }
    }
    let sum: f64 = values.iter().sum();
    if (sum - 1.0).abs() > tolerance {
        return Err(HmmError::MalformedDistribution {
            table,
            row: row.to_string(),
            sum,
        });
    }
    Ok(())
}

//
// Builder
//

///
/// Build `HmmModel` by specifying each probability by symbols,
/// in the manner of a transition table DSL.
///
/// Entries never specified are 0. Specifying the same entry twice overwrites it.
///
/// ```
/// use dhmm::hmm::HmmModel;
/// let model = HmmModel::builder(vec!['A', 'B'], vec!['x', 'y'])
///     .initial('A', 0.5)
///     .initial('B', 0.5)
///     .transition('A', 'A', 0.6)
///     .transition('A', 'B', 0.4)
///     .transition('B', 'A', 0.3)
///     .transition('B', 'B', 0.7)
///     .emission('A', 'x', 0.9)
///     .emission('A', 'y', 0.1)
///     .emission('B', 'x', 0.2)
///     .emission('B', 'y', 0.8)
///     .build()
///     .unwrap();
/// assert_eq!(model.transition_prob(&'B', &'A').unwrap(), 0.3);
/// ```
#[derive(Debug, Clone)]
pub struct HmmModelBuilder<S: Symbol, O: Symbol> {
    states: Vec<S>,
    observations: Vec<O>,
    initial: Vec<(S, f64)>,
    transition: Vec<(S, S, f64)>,
    emission: Vec<(S, O, f64)>,
    tolerance: f64,
}

impl<S: Symbol, O: Symbol> HmmModelBuilder<S, O> {
    pub fn new(states: Vec<S>, observations: Vec<O>) -> Self {
        HmmModelBuilder {
            states,
            observations,
            initial: Vec::new(),
            transition: Vec::new(),
            emission: Vec::new(),
            tolerance: DEFAULT_TOLERANCE,
        }
    }
    pub fn initial(mut self, state: S, p: f64) -> Self {
        self.initial.push((state, p));
        self
    }
    pub fn transition(mut self, source: S, target: S, p: f64) -> Self {
        self.transition.push((source, target, p));
        self
    }
    pub fn emission(mut self, state: S, observation: O, p: f64) -> Self {
        self.emission.push((state, observation, p));
        self
    }
    /// Override the tolerance used in validation
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
    ///
    /// Resolve the symbols into dense tables and validate them.
    ///
    pub fn build(self) -> Result<HmmModel<S, O>> {
        let states = Domain::new("state", self.states)?;
        let observations = Domain::new("observation", self.observations)?;
        let n = states.len();
        let m = observations.len();

        let mut initial = vec![0.0; n];
        for (state, p) in self.initial.iter() {
            initial[states.index_of(state)?] = *p;
        }
        let mut transition = ProbTable::zeros(n, n);
        for (source, target, p) in self.transition.iter() {
            transition[(states.index_of(source)?, states.index_of(target)?)] = *p;
        }
        let mut emission = ProbTable::zeros(n, m);
        for (state, observation, p) in self.emission.iter() {
            emission[(states.index_of(state)?, observations.index_of(observation)?)] = *p;
        }

        HmmModel::from_parts(
            states,
            observations,
            initial,
            transition,
            emission,
            self.tolerance,
        )
    }
}

//
// Tests
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hmm::mocks::{mock_two_state, mock_weather, Weather};

    #[test]
    fn hmm_model_accessors() {
        let model = mock_two_state();
        assert_eq!(model.n_states(), 2);
        assert_eq!(model.n_observations(), 2);
        assert_eq!(model.initial_prob(&'A').unwrap(), 0.5);
        assert_eq!(model.transition_prob(&'A', &'B').unwrap(), 0.4);
        assert_eq!(model.emission_prob(&'B', &'y').unwrap(), 0.8);
        assert_eq!(model.p_emit(0, 0), 0.9);
        assert!(matches!(
            model.transition_prob(&'A', &'C'),
            Err(HmmError::UnknownSymbol { domain: "state", .. })
        ));
        assert!(matches!(
            model.emission_prob(&'A', &'z'),
            Err(HmmError::UnknownSymbol {
                domain: "observation",
                ..
            })
        ));
    }
    #[test]
    fn hmm_model_new_matches_builder() {
        let model = HmmModel::new(
            vec!['A', 'B'],
            vec!['x', 'y'],
            vec![0.5, 0.5],
            vec![vec![0.6, 0.4], vec![0.3, 0.7]],
            vec![vec![0.9, 0.1], vec![0.2, 0.8]],
        )
        .unwrap();
        assert_eq!(model, mock_two_state());
        assert_abs_diff_eq!(model.max_param_diff(&mock_two_state()), 0.0);
    }
    #[test]
    fn hmm_model_rejects_malformed_distributions() {
        // initial does not sum to 1
        let r = HmmModel::new(
            vec!['A', 'B'],
            vec!['x'],
            vec![0.5, 0.6],
            vec![vec![0.5, 0.5], vec![0.5, 0.5]],
            vec![vec![1.0], vec![1.0]],
        );
        assert!(matches!(
            r,
            Err(HmmError::MalformedDistribution {
                table: "initial",
                ..
            })
        ));
        // negative probability
        let r = HmmModel::new(
            vec!['A', 'B'],
            vec!['x'],
            vec![0.5, 0.5],
            vec![vec![1.2, -0.2], vec![0.5, 0.5]],
            vec![vec![1.0], vec![1.0]],
        );
        assert!(matches!(
            r,
            Err(HmmError::InvalidProbability {
                table: "transition",
                ..
            })
        ));
        // NaN
        let r = HmmModel::new(
            vec!['A'],
            vec!['x', 'y'],
            vec![1.0],
            vec![vec![1.0]],
            vec![vec![f64::NAN, 1.0]],
        );
        assert!(matches!(r, Err(HmmError::InvalidProbability { .. })));
        // wrong shape
        let r = HmmModel::new(
            vec!['A', 'B'],
            vec!['x'],
            vec![0.5, 0.5],
            vec![vec![1.0], vec![0.5, 0.5]],
            vec![vec![1.0], vec![1.0]],
        );
        assert!(matches!(r, Err(HmmError::DimensionMismatch { .. })));
        // emission row missing in builder
        let r = HmmModel::builder(vec!["a", "b"], vec![0u8, 1u8])
            .initial("a", 1.0)
            .transition("a", "a", 1.0)
            .transition("b", "b", 1.0)
            .emission("a", 0, 1.0)
            .build();
        assert!(matches!(
            r,
            Err(HmmError::MalformedDistribution {
                table: "emission",
                ..
            })
        ));
    }
    #[test]
    fn hmm_model_tolerance() {
        let r = HmmModel::builder(vec!['A'], vec!['x', 'y'])
            .initial('A', 1.0)
            .transition('A', 'A', 1.0)
            .emission('A', 'x', 0.5)
            .emission('A', 'y', 0.5 + 1e-12)
            .build();
        assert!(r.is_ok());
        let r = HmmModel::builder(vec!['A'], vec!['x', 'y'])
            .initial('A', 1.0)
            .transition('A', 'A', 1.0)
            .emission('A', 'x', 0.5)
            .emission('A', 'y', 0.49)
            .tolerance(0.001)
            .build();
        assert!(r.is_err());
    }
    #[test]
    fn hmm_model_enum_states() {
        let model = mock_weather();
        assert_eq!(model.states().items(), &[Weather::Sunny, Weather::Rainy]);
        assert_eq!(
            model
                .emission_prob(&Weather::Rainy, &"clean".to_string())
                .unwrap(),
            0.5
        );
        let labeled: Vec<(&Weather, f64)> = model.label_states(model.initial()).collect();
        assert_eq!(labeled, vec![(&Weather::Sunny, 0.6), (&Weather::Rainy, 0.4)]);
        println!("{}", model);
    }
}
