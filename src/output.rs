//! Output of the final dictionary

use crate::{top::RankedEntry, Result};
use std::{fmt, path::Path};
use tokio::{
    fs::File,
    io::{AsyncWriteExt, BufWriter},
};

/// One dictionary line: the word, a tab, then the IDF with 13 decimals
/// right-aligned in a 15 characters wide field
///
/// Infinite and undefined IDFs, which only occur without any volume in the
/// time window, are spelled out as `Infinity`, `-Infinity` and `NaN`.
impl fmt::Display for RankedEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.idf.is_finite() {
            return write!(f, "{}\t{:15.13}", self.word, self.idf);
        }
        let idf = if self.idf.is_nan() {
            "NaN"
        } else if self.idf > 0.0 {
            "Infinity"
        } else {
            "-Infinity"
        };
        write!(f, "{}\t{idf:>15}", self.word)
    }
}

/// Write down the ranked words, one per line, replacing any existing file
pub async fn write(path: &Path, ranked: &[RankedEntry<'_>]) -> Result<()> {
    let mut out = BufWriter::new(File::create(path).await?);
    for entry in ranked {
        out.write_all(format!("{entry}\n").as_bytes()).await?;
    }
    out.flush().await?;
    Ok(())
}
