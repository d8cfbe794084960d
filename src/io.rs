//!
//! JSON files of models and corpora
//!
//! Model file:
//!
//! ```text
//! {
//!   "states": ["A", "B"],
//!   "observations": ["x", "y"],
//!   "initial": [["A", 0.5], ["B", 0.5]],
//!   "transition": [["A", "A", 0.6], ["A", "B", 0.4], ...],
//!   "emission": [["A", "x", 0.9], ...]
//! }
//! ```
//!
//! Entries that are omitted are 0. Zero entries are not written.
//!
//! Corpus file is an array of observation sequences.
//!
//! Likelihood report lists `P(x)` of each sequence and the joint probability
//! of the corpus, each in the `Display` form of `Prob`.
//!
use crate::error::Result;
use crate::hmm::{HmmModel, Symbol};
use crate::prob::Prob;
use itertools::iproduct;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Serialized form of `HmmModel`
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFile<S, O> {
    pub states: Vec<S>,
    pub observations: Vec<O>,
    pub initial: Vec<(S, f64)>,
    pub transition: Vec<(S, S, f64)>,
    pub emission: Vec<(S, O, f64)>,
}

impl<S: Symbol, O: Symbol> HmmModel<S, O> {
    ///
    /// Convert into the keyed form, dropping zero entries.
    ///
    pub fn to_model_file(&self) -> ModelFile<S, O> {
        let states = self.states().items();
        let observations = self.observations().items();
        let n = self.n_states();
        let m = self.n_observations();
        ModelFile {
            states: states.to_vec(),
            observations: observations.to_vec(),
            initial: (0..n)
                .filter(|&k| self.p_init(k) > 0.0)
                .map(|k| (states[k].clone(), self.p_init(k)))
                .collect(),
            transition: iproduct!(0..n, 0..n)
                .filter(|&(k, l)| self.p_trans(k, l) > 0.0)
                .map(|(k, l)| (states[k].clone(), states[l].clone(), self.p_trans(k, l)))
                .collect(),
            emission: iproduct!(0..n, 0..m)
                .filter(|&(k, o)| self.p_emit(k, o) > 0.0)
                .map(|(k, o)| {
                    (
                        states[k].clone(),
                        observations[o].clone(),
                        self.p_emit(k, o),
                    )
                })
                .collect(),
        }
    }
    ///
    /// Build and validate a model from the keyed form.
    ///
    pub fn from_model_file(file: ModelFile<S, O>) -> Result<Self> {
        let builder = HmmModel::builder(file.states, file.observations);
        let builder = file
            .initial
            .into_iter()
            .fold(builder, |b, (s, p)| b.initial(s, p));
        let builder = file
            .transition
            .into_iter()
            .fold(builder, |b, (s, t, p)| b.transition(s, t, p));
        let builder = file
            .emission
            .into_iter()
            .fold(builder, |b, (s, o, p)| b.emission(s, o, p));
        builder.build()
    }
}

/// Likelihood of one sequence in `LikelihoodReport`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequenceLikelihood {
    pub index: usize,
    pub length: usize,
    pub likelihood: Prob,
}

/// Likelihoods of a corpus under a model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LikelihoodReport {
    pub sequences: Vec<SequenceLikelihood>,
    pub total: Prob,
}

impl<S: Symbol, O: Symbol> HmmModel<S, O> {
    ///
    /// Likelihood of each sequence of the corpus and of the whole corpus.
    ///
    pub fn likelihood_report<T: AsRef<[O]>>(&self, corpus: &[T]) -> Result<LikelihoodReport> {
        let total = self.corpus_log_likelihood(corpus)?;
        let sequences = corpus
            .iter()
            .zip(self.sequence_likelihoods(corpus)?)
            .enumerate()
            .map(|(index, (seq, likelihood))| SequenceLikelihood {
                index,
                length: seq.as_ref().len(),
                likelihood,
            })
            .collect();
        Ok(LikelihoodReport { sequences, total })
    }
}

///
/// Read a model from JSON file
///
pub fn read_model<S, O, P>(path: P) -> Result<HmmModel<S, O>>
where
    S: Symbol + DeserializeOwned,
    O: Symbol + DeserializeOwned,
    P: AsRef<Path>,
{
    let reader = BufReader::new(File::open(path)?);
    let file: ModelFile<S, O> = serde_json::from_reader(reader)?;
    HmmModel::from_model_file(file)
}

///
/// Write a model into JSON file
///
pub fn write_model<S, O, P>(path: P, model: &HmmModel<S, O>) -> Result<()>
where
    S: Symbol + Serialize,
    O: Symbol + Serialize,
    P: AsRef<Path>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &model.to_model_file())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

///
/// Read a corpus (array of arrays of observations) from JSON file
///
pub fn read_corpus<O, P>(path: P) -> Result<Vec<Vec<O>>>
where
    O: DeserializeOwned,
    P: AsRef<Path>,
{
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

///
/// Write a corpus into JSON file
///
pub fn write_corpus<O, P>(path: P, corpus: &[Vec<O>]) -> Result<()>
where
    O: Serialize,
    P: AsRef<Path>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, corpus)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HmmError;
    use crate::hmm::mocks::{mock_two_state, mock_two_state_without_y};
    use crate::prob::p;

    #[test]
    fn io_model_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let model = mock_two_state();
        write_model(&path, &model).unwrap();
        let loaded: HmmModel<char, char> = read_model(&path).unwrap();
        assert_eq!(model, loaded);
    }
    #[test]
    fn io_model_file_drops_zeros() {
        let model = mock_two_state_without_y();
        let file = model.to_model_file();
        assert_eq!(file.emission, vec![('A', 'x', 1.0), ('B', 'x', 1.0)]);
        assert_eq!(file.transition.len(), 4);
        assert_eq!(HmmModel::from_model_file(file).unwrap(), model);
    }
    #[test]
    fn io_model_file_from_json() {
        let json = r#"{
            "states": ["rain", "sun"],
            "observations": ["umbrella", "none"],
            "initial": [["rain", 0.2], ["sun", 0.8]],
            "transition": [["rain", "rain", 0.7], ["rain", "sun", 0.3], ["sun", "sun", 1.0]],
            "emission": [["rain", "umbrella", 0.9], ["rain", "none", 0.1], ["sun", "none", 1.0]]
        }"#;
        let file: ModelFile<String, String> = serde_json::from_str(json).unwrap();
        let model = HmmModel::from_model_file(file).unwrap();
        assert_eq!(
            model
                .transition_prob(&"sun".to_string(), &"rain".to_string())
                .unwrap(),
            0.0
        );
        assert_eq!(
            model
                .emission_prob(&"rain".to_string(), &"umbrella".to_string())
                .unwrap(),
            0.9
        );

        // does not sum to 1
        let json = r#"{
            "states": ["a"],
            "observations": ["x"],
            "initial": [["a", 1.0]],
            "transition": [["a", "a", 0.5]],
            "emission": [["a", "x", 1.0]]
        }"#;
        let file: ModelFile<String, String> = serde_json::from_str(json).unwrap();
        assert!(matches!(
            HmmModel::from_model_file(file),
            Err(HmmError::MalformedDistribution { .. })
        ));
    }
    #[test]
    fn io_corpus_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        let corpus = mock_two_state().sample_corpus(4, 6, 0).unwrap();
        write_corpus(&path, &corpus).unwrap();
        let loaded: Vec<Vec<char>> = read_corpus(&path).unwrap();
        assert_eq!(corpus, loaded);

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            read_corpus::<char, _>(&missing),
            Err(HmmError::Io(_))
        ));
        std::fs::write(&path, "[[1, 2], 3]").unwrap();
        assert!(matches!(
            read_corpus::<u8, _>(&path),
            Err(HmmError::Json(_))
        ));
    }
    #[test]
    fn io_likelihood_report() {
        let model = mock_two_state();
        let report = model
            .likelihood_report(&[vec!['x'], vec!['x', 'y']])
            .unwrap();
        assert_eq!(report.sequences.len(), 2);
        assert_eq!(report.sequences[1].index, 1);
        assert_eq!(report.sequences[1].length, 2);
        assert_abs_diff_eq!(report.sequences[0].likelihood.to_value(), 0.55, epsilon = 1e-12);
        assert_abs_diff_eq!(report.total.to_value(), 0.55 * 0.23, epsilon = 1e-12);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json["sequences"][0]["likelihood"],
            serde_json::Value::String(p(0.55).to_string())
        );
        assert_eq!(
            json["total"],
            serde_json::Value::String(report.total.to_string())
        );

        let impossible = mock_two_state_without_y()
            .likelihood_report(&[vec!['y']])
            .unwrap();
        assert!(impossible.total.is_zero());
        let empty: Vec<Vec<char>> = vec![];
        assert!(matches!(
            model.likelihood_report(&empty),
            Err(HmmError::EmptyCorpus)
        ));
    }
}
