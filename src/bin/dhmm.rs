use clap::{Parser, Subcommand};
use dhmm::{
    hmm::{HmmModel, TrainParams, UnvisitedStatePolicy, ZeroEvidencePolicy},
    io::{read_corpus, read_model, write_corpus, write_model},
    HmmError,
};
use log::info;

type Model = HmmModel<String, String>;

#[derive(Parser, Debug)]
#[clap(author, about, version)]
struct Opts {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run Baum-Welch re-estimation steps on a corpus
    Train {
        /// Initial model JSON filename
        #[clap(short, long)]
        model: std::path::PathBuf,
        /// Corpus JSON filename
        #[clap(short, long)]
        corpus: std::path::PathBuf,
        /// Number of re-estimation steps
        #[clap(short = 'n', default_value_t = 1)]
        n_iterations: usize,
        /// Output model JSON filename. If not specified, print to stdout.
        #[clap(short, long)]
        output: Option<std::path::PathBuf>,
        /// Accumulate sequences in parallel
        #[clap(long)]
        parallel: bool,
        /// Skip sequences that have zero probability instead of failing
        #[clap(long)]
        skip_zero: bool,
        /// Fail if some state is never visited instead of keeping its row
        #[clap(long)]
        fail_unvisited: bool,
    },
    /// Sample a corpus from a model
    Sample {
        /// Model JSON filename
        #[clap(short, long)]
        model: std::path::PathBuf,
        /// Number of sequences
        #[clap(short = 'n')]
        n_sequences: usize,
        /// Length of each sequence
        #[clap(short = 'l')]
        length: usize,
        /// Seed of the random number generator
        #[clap(short = 's', default_value_t = 0)]
        seed: u64,
        /// Output corpus JSON filename. If not specified, print to stdout.
        #[clap(short, long)]
        output: Option<std::path::PathBuf>,
    },
    /// Calculate likelihoods of each sequence and of the whole corpus
    Likelihood {
        /// Model JSON filename
        #[clap(short, long)]
        model: std::path::PathBuf,
        /// Corpus JSON filename
        #[clap(short, long)]
        corpus: std::path::PathBuf,
    },
}

fn main() -> Result<(), HmmError> {
    env_logger::init();
    let opts: Opts = Opts::parse();
    info!("n_threads={}", rayon::current_num_threads());
    info!("opts={:?}", opts);
    match opts.command {
        Commands::Train {
            model,
            corpus,
            n_iterations,
            output,
            parallel,
            skip_zero,
            fail_unvisited,
        } => {
            let mut model: Model = read_model(model)?;
            let corpus: Vec<Vec<String>> = read_corpus(corpus)?;
            let params = TrainParams::new(
                if skip_zero {
                    ZeroEvidencePolicy::Skip
                } else {
                    ZeroEvidencePolicy::Fail
                },
                if fail_unvisited {
                    UnvisitedStatePolicy::Fail
                } else {
                    UnvisitedStatePolicy::KeepPrior
                },
                parallel,
            );
            info!("params={}", params);
            for i in 0..n_iterations {
                info!(
                    "step#{} likelihood={}",
                    i,
                    model.corpus_log_likelihood(&corpus)?
                );
                model = model.train_one_step_with(&corpus, &params)?;
            }
            info!(
                "step#{} likelihood={}",
                n_iterations,
                model.corpus_log_likelihood(&corpus)?
            );
            match output {
                Some(output) => write_model(output, &model)?,
                None => println!(
                    "{}",
                    serde_json::to_string_pretty(&model.to_model_file())?
                ),
            }
        }
        Commands::Sample {
            model,
            n_sequences,
            length,
            seed,
            output,
        } => {
            let model: Model = read_model(model)?;
            let corpus = model.sample_corpus(n_sequences, length, seed)?;
            match output {
                Some(output) => write_corpus(output, &corpus)?,
                None => println!("{}", serde_json::to_string(&corpus)?),
            }
        }
        Commands::Likelihood { model, corpus } => {
            let model: Model = read_model(model)?;
            let corpus: Vec<Vec<String>> = read_corpus(corpus)?;
            let report = model.likelihood_report(&corpus)?;
            info!("total likelihood={}", report.total);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
