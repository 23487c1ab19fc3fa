//! Processing of gzipped TSV data files from Google

pub mod filter;

use crate::{
    dictionary::{Dictionary, FileDictionary, FileDictionaryBuilder},
    progress::{ProgressConfig, ProgressReport, ProgressTracker, Work},
    Result, VolumeCount, Word, Year,
};
use anyhow::Context;
use async_compression::tokio::bufread::GzipDecoder;
use futures::{future, stream, Stream, StreamExt, TryStreamExt};
use std::{
    io,
    num::ParseIntError,
    path::{Path, PathBuf},
    pin::pin,
    str::FromStr,
};
use thiserror::Error;
use tokio::{
    fs::File,
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
};
use tokio_util::io::{ReaderStream, StreamReader};

/// Number of tab-separated fields in a data file entry
const NUM_FIELDS: usize = 4;

/// Entry from the dataset
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Entry {
    /// (Case-sensitive, possibly tagged) word whose frequency is being studied
    pub word: Word,

    /// Year on which the data was recorded
    pub year: Year,

    /// Number of recorded occurences
    ///
    /// Only kept for parity with the data format, the dictionary is built
    /// from volume counts alone.
    pub match_count: i64,

    /// Number of books across which occurences were recorded
    pub volume_count: VolumeCount,
}
//
impl Entry {
    /// Parse an entry from its fields
    ///
    /// There must be exactly 4 fields: word, year, match count and volume
    /// count. The word is taken as-is, without any trimming or case folding.
    pub fn parse<'a>(fields: impl IntoIterator<Item = &'a str>) -> Result<Self, ParseError> {
        let mut parts = [""; NUM_FIELDS];
        let mut found = 0;
        for field in fields {
            if found < NUM_FIELDS {
                parts[found] = field;
            }
            found += 1;
        }
        if found != NUM_FIELDS {
            return Err(ParseError::FieldCount {
                expected: NUM_FIELDS,
                found,
            });
        }
        let [word, year, match_count, volume_count] = parts;
        Ok(Self {
            word: word.into(),
            year: parse_number("year", year)?,
            match_count: parse_number("match count", match_count)?,
            volume_count: parse_number("volume count", volume_count)?,
        })
    }
}
//
impl FromStr for Entry {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, ParseError> {
        Self::parse(line.split('\t'))
    }
}

/// Malformed record in one of the input files
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ParseError {
    /// Record does not have the expected number of fields
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    /// Numerical field could not be parsed
    #[error("invalid {field} {value:?}: {source}")]
    Number {
        field: &'static str,
        value: Box<str>,
        source: ParseIntError,
    },
}

/// Parse a numerical field
pub fn parse_number<T>(field: &'static str, value: &str) -> Result<T, ParseError>
where
    T: FromStr<Err = ParseIntError>,
{
    value.parse().map_err(|source| ParseError::Number {
        field,
        value: value.into(),
        source,
    })
}

/// Read a set of data files in the specified order, merge their dictionaries
///
/// When a word appears in several files, the dictionary of the last file
/// wins, see [`Dictionary::merge()`].
pub async fn read_and_merge(
    paths: &[PathBuf],
    cutoff_year: Year,
    report: &ProgressReport,
) -> Result<Dictionary> {
    // Track file processing
    let files = report.add(
        "Processing data files",
        ProgressConfig::new(Work::Steps(paths.len())).dont_show_rate_eta(),
    );
    let mut total_bytes = 0;
    for path in paths {
        let metadata = tokio::fs::metadata(path)
            .await
            .with_context(|| format!("querying the size of {}", path.display()))?;
        total_bytes += metadata.len();
    }
    let bytes = report.add(
        "Reading compressed data",
        ProgressConfig::new(Work::Bytes(total_bytes)),
    );

    // Process files one after another, merging their data as we go
    let mut dictionary = Dictionary::new();
    for path in paths {
        let file_dictionary = read_file(path, cutoff_year, bytes.clone()).await?;
        let file_len = file_dictionary.len();
        dictionary.merge(file_dictionary);
        log::info!(
            "{} -> {file_len}, total={}",
            file_name(path),
            dictionary.len()
        );
        files.make_progress(1);
    }
    Ok(dictionary)
}

/// Read a data file and aggregate the volume counts inside
pub async fn read_file(
    path: &Path,
    cutoff_year: Year,
    bytes: ProgressTracker,
) -> Result<FileDictionary> {
    // Open the file and slice it into chunks of bytes
    let file = File::open(path)
        .await
        .with_context(|| format!("opening {}", path.display()))?;
    let gz_bytes = StreamReader::new(ReaderStream::new(file).map(move |res| {
        // Track how many input bytes have been read so far
        res.inspect(|bytes_block| {
            bytes.make_progress(bytes_block.len() as u64);
        })
    }));

    // Apply gzip decoder to compressed bytes
    let mut tsv_bytes = GzipDecoder::new(gz_bytes);
    tsv_bytes.multiple_members(true);

    // Split uncompressed bytes into lines, then parse entries
    let entries = lines(BufReader::new(tsv_bytes)).map(|line| -> Result<Entry> {
        let (line_number, line) = line?;
        line.parse::<Entry>()
            .with_context(|| format!("parsing line {line_number}"))
    });

    // Filter out entries which are too old
    let mut year_filter = filter::make_year_filter(cutoff_year);
    let mut entries = pin!(entries.try_filter(move |entry| future::ready(year_filter(entry))));

    // Accumulate volume counts from entries
    let mut dictionary = FileDictionaryBuilder::new();
    let context = || format!("reading and processing {}", path.display());
    while let Some(entry) = entries.next().await {
        dictionary.add_entry(entry.with_context(context)?);
    }
    Ok(dictionary.finish_file())
}

/// Split text into numbered lines
///
/// Every line counts, including empty ones, so that they get rejected by the
/// entry parser. Line terminators (`\n` or `\r\n`) are removed, and invalid
/// UTF-8 sequences are replaced with U+FFFD instead of failing the whole file.
fn lines(
    reader: impl AsyncBufRead + Unpin,
) -> impl Stream<Item = io::Result<(u64, String)>> {
    let state = (reader, Vec::new(), 0);
    stream::try_unfold(state, |(mut reader, mut buf, line_number)| async move {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok::<_, io::Error>(None);
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        let line = String::from_utf8_lossy(&buf).into_owned();
        let line_number = line_number + 1;
        Ok(Some(((line_number, line), (reader, buf, line_number))))
    })
}

/// Display name of a data file
fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into())
}

/// Compress some text with gzip, to build test inputs
#[cfg(test)]
pub async fn gzip(text: &str) -> Vec<u8> {
    gzip_bytes(text.as_bytes()).await
}

/// Compress arbitrary bytes with gzip, to build test inputs
#[cfg(test)]
pub async fn gzip_bytes(data: &[u8]) -> Vec<u8> {
    use async_compression::tokio::write::GzipEncoder;
    use tokio::io::AsyncWriteExt;
    let mut encoder = GzipEncoder::new(Vec::new());
    encoder.write_all(data).await.unwrap();
    encoder.shutdown().await.unwrap();
    encoder.into_inner()
}
