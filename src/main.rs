//! Build a dictionary of inverse document frequencies from the unigram files of
//! the Google Books Ngram dataset, whose general documentation you can find at
//! <http://storage.googleapis.com/books/ngrams/books/datasetsv2.html>.

mod config;
mod dictionary;
mod input;
mod output;
mod progress;
mod top;
mod totals;
mod tsv;

use crate::{config::Config, input::InputFiles, progress::ProgressReport};
use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use std::{num::NonZeroUsize, path::PathBuf};

/// Rank the vocabulary of a Google Books unigram dataset by inverse document
/// frequency, and write down the most common words with their IDF
///
/// Book volumes play the role of documents: the IDF of a word is the natural
/// logarithm of the total number of volumes over the number of volumes in
/// which the word appears, both measured over the most recent years.
#[derive(Parser, Debug)]
#[command(version, author)]
struct Args {
    /// Number of most recent years to include
    ///
    /// This sets the size of the window of yearly totals which is used to
    /// compute the total number of volumes, and any data file entry older than
    /// the oldest year of this window is ignored.
    #[arg(short = 'y', long = "years", default_value = "25")]
    num_years: NonZeroUsize,

    /// Number of words to keep, by decreasing volume count
    #[arg(short = 'k', long = "words", default_value = "100000")]
    num_words: usize,

    /// Directory containing the data files
    ///
    /// Should contain gzipped unigram files named like
    /// `googlebooks-eng-all-1gram-20120701-a.gz` and one total counts file,
    /// whose name contains "totalcounts".
    #[arg(value_name = "INPUT_DIR")]
    input_dir: PathBuf,

    /// Output file
    #[arg(value_name = "OUT")]
    output: PathBuf,
}
//
impl Args {
    /// Decode and validate CLI arguments
    pub fn parse_and_check() -> Result<Self> {
        // Decode CLI arguments
        let args = Args::parse();

        // Check CLI arguments for basic sanity
        anyhow::ensure!(
            args.input_dir.is_dir(),
            "input directory {} does not exist or is not a directory",
            args.input_dir.display()
        );
        Ok(args)
    }
}
//
#[tokio::main]
async fn main() -> Result<()> {
    // Set up logging
    setup_logging().map_err(|e| anyhow::format_err!("{e}"))?;

    // Decode CLI arguments
    let config = Config::new(Args::parse_and_check()?);

    // Set up progress reporting
    let report = ProgressReport::new();

    // Do the work
    run(&config, &report).await
}

/// Compute the IDF dictionary and write it down
async fn run(config: &Config, report: &ProgressReport) -> Result<()> {
    // Locate the input data
    let files = InputFiles::discover(&config.input_dir).await?;

    // Determine the time window of interest and the number of documents
    let totals = totals::read(&files.totals, config.num_years).await?;
    log::info!(
        "First year: {}, total volumes: {}",
        totals.cutoff_year,
        totals.total_volumes
    );

    // Aggregate volume counts from all data files
    let dictionary = tsv::read_and_merge(&files.letter_files, totals.cutoff_year, report).await?;

    // Pick the most common words and write them down
    let ranked = top::pick_top_words(&dictionary, totals.total_volumes, config.num_words);
    output::write(&config.output, &ranked)
        .await
        .with_context(|| format!("writing the dictionary to {}", config.output.display()))?;
    log::info!(
        "Wrote {} words to {}",
        ranked.len(),
        config.output.display()
    );
    Ok(())
}

/// Use anyhow for Result type erasure
pub use anyhow::Result;

/// Word from the dataset, possibly with a part-of-speech tag
pub type Word = Box<str>;

/// Year of Gregorian Calendar
pub type Year = i32;

/// Number of books (volumes) in which a word was seen
///
/// Signed because the dataset format does not forbid negative numbers, even
/// though no legitimate volume count can be negative.
pub type VolumeCount = i64;

/// Set up logging
fn setup_logging() -> syslog::Result<()> {
    syslog::init(
        syslog::Facility::LOG_USER,
        if cfg!(feature = "log-trace") {
            LevelFilter::Trace
        } else if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        },
        None,
    )
}
