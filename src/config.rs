//! Processing pipeline configuration

use crate::Args;
use std::{num::NonZeroUsize, path::PathBuf};

/// Final process configuration
///
/// This is the result of digesting [`Args`]. Please refer to [`Args`] to know
/// more about individual fields.
#[allow(missing_docs)]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Config {
    pub input_dir: PathBuf,
    pub output: PathBuf,
    pub num_years: NonZeroUsize,
    pub num_words: usize,
}
//
impl Config {
    /// Determine process configuration from CLI arguments
    pub(crate) fn new(args: Args) -> Self {
        let Args {
            num_years,
            num_words,
            input_dir,
            output,
        } = args;
        Self {
            input_dir,
            output,
            num_years,
            num_words,
        }
    }
}
