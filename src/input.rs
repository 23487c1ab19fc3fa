//! Location of the data files within the input directory

use crate::Result;
use anyhow::Context;
use std::path::{Path, PathBuf};

/// Data files of a Google Books unigram dataset
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InputFiles {
    /// Total counts file
    pub totals: PathBuf,

    /// Gzipped data files, sorted by name
    pub letter_files: Vec<PathBuf>,
}
//
impl InputFiles {
    /// Look up the data files within a directory
    pub async fn discover(dir: &Path) -> Result<Self> {
        // Collect file names, ignoring those that aren't valid Unicode
        let context = || format!("listing the contents of {}", dir.display());
        let mut entries = tokio::fs::read_dir(dir).await.with_context(context)?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.with_context(context)? {
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(name) => log::debug!("Ignoring non-Unicode file name {name:?}"),
            }
        }
        names.sort_unstable();

        // Pick the relevant files
        let totals = names
            .iter()
            .find(|name| is_totals_file(name))
            .map(|name| dir.join(name))
            .with_context(|| format!("no total counts file found in {}", dir.display()))?;
        let letter_names = names
            .iter()
            .filter(|name| is_letter_file(name))
            .collect::<Vec<_>>();
        log::info!("Using files: {letter_names:?}");
        let letter_files = letter_names.into_iter().map(|name| dir.join(name)).collect();
        Ok(Self {
            totals,
            letter_files,
        })
    }
}

/// Truth that a file name designates the total counts file
pub fn is_totals_file(name: &str) -> bool {
    name.contains("totalcounts")
}

/// Truth that a file name designates a gzipped data file
///
/// Data files are named like `googlebooks-eng-all-1gram-20120701-a.gz`: the
/// part between the last dash and the `.gz` extension must be a non-empty
/// sequence of ASCII letters, digits and underscores.
pub fn is_letter_file(name: &str) -> bool {
    let Some(stem) = name.strip_suffix(".gz") else {
        return false;
    };
    let Some((_prefix, suffix)) = stem.rsplit_once('-') else {
        return false;
    };
    !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_letter_files() {
        for name in [
            "googlebooks-eng-all-1gram-20120701-a.gz",
            "googlebooks-eng-all-1gram-20120701-other.gz",
            "googlebooks-eng-all-1gram-20120701-_NOUN_.gz",
            "-x.gz",
        ] {
            assert!(is_letter_file(name), "{name:?} should be a data file");
        }
        for name in [
            "googlebooks-eng-all-1gram-20120701-a.gz.part",
            "googlebooks-eng-all-1gram-20120701-.gz",
            "googlebooks-eng-all-1gram-20120701-a.b.gz",
            "googlebooks-eng-all-totalcounts-20120701.txt",
            "a.gz",
        ] {
            assert!(!is_letter_file(name), "{name:?} should not be a data file");
        }
    }

    #[test]
    fn recognizes_totals_file() {
        assert!(is_totals_file("googlebooks-eng-all-totalcounts-20120701.txt"));
        assert!(!is_totals_file("googlebooks-eng-all-1gram-20120701-t.gz"));
    }

    #[tokio::test]
    async fn discovers_sorted_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "data-b.gz",
            "data-a.gz",
            "notes.txt",
            "eng-totalcounts-2012.txt",
            "data-c.gz.bak",
        ] {
            tokio::fs::write(dir.path().join(name), b"").await.unwrap();
        }
        let files = InputFiles::discover(dir.path()).await.unwrap();
        assert_eq!(files.totals, dir.path().join("eng-totalcounts-2012.txt"));
        assert_eq!(
            files.letter_files,
            vec![dir.path().join("data-a.gz"), dir.path().join("data-b.gz")]
        );
    }

    #[tokio::test]
    async fn requires_totals_file() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("data-a.gz"), b"").await.unwrap();
        assert!(InputFiles::discover(dir.path()).await.is_err());
    }
}
