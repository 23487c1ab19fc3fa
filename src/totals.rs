//! Yearly totals of the dataset
//!
//! The total counts file lists, for every year, the number of matches, pages
//! and volumes recorded by Google. It is a single line of tab-separated
//! records, each of which is made of comma-separated fields, preceded by a
//! blank placeholder record:
//!
//! ```text
//!  <TAB>1505,32059,231,1<TAB>1507,49586,477,1<TAB>...
//! ```

use crate::{
    tsv::{parse_number, ParseError},
    Result, VolumeCount, Year,
};
use anyhow::Context;
use std::{collections::VecDeque, num::NonZeroUsize, path::Path};

/// Number of comma-separated fields in a yearly record
const NUM_FIELDS: usize = 4;

/// What we learn from the total counts file
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub struct Totals {
    /// Oldest year within the time window of interest
    pub cutoff_year: Year,

    /// Number of volumes published within the time window of interest
    pub total_volumes: VolumeCount,
}

/// Read the total counts file, keeping the most recent `num_years` records
pub async fn read(path: &Path, num_years: NonZeroUsize) -> Result<Totals> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading total counts from {}", path.display()))?;
    parse(&text, num_years).with_context(|| format!("parsing total counts from {}", path.display()))
}

/// Parse the contents of the total counts file
pub fn parse(text: &str, num_years: NonZeroUsize) -> Result<Totals, ParseError> {
    let mut tokens = text
        .split(['\t', ',', '\n', '\r'])
        // Skip the leading placeholder record
        .skip(1)
        .map(str::trim)
        .filter(|token| !token.is_empty());
    let mut window = YearWindow::new(num_years);
    while let Some(year) = tokens.next() {
        let mut fields = [year; NUM_FIELDS];
        for (found, field) in (1..).zip(&mut fields[1..]) {
            *field = tokens.next().ok_or(ParseError::FieldCount {
                expected: NUM_FIELDS,
                found,
            })?;
        }
        // Match and page counts are validated but otherwise unused
        let [year, match_count, page_count, volume_count] = fields;
        let year = parse_number("year", year)?;
        parse_number::<i64>("match count", match_count)?;
        parse_number::<i64>("page count", page_count)?;
        window.push(year, parse_number("volume count", volume_count)?);
    }
    Ok(window.finish())
}

/// Sliding window over the most recent yearly records
///
/// Records are expected to come in order of increasing year, so the window
/// holds the last `capacity` years that were pushed into it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct YearWindow {
    /// Maximal number of records
    capacity: NonZeroUsize,

    /// Retained (year, volume count) records, oldest first
    records: VecDeque<(Year, VolumeCount)>,
}
//
impl YearWindow {
    /// Create an empty window
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            records: VecDeque::with_capacity(capacity.get()),
        }
    }

    /// Add a yearly record, evicting the oldest one if the window is full
    pub fn push(&mut self, year: Year, volume_count: VolumeCount) {
        if self.records.len() == self.capacity.get() {
            self.records.pop_front();
        }
        self.records.push_back((year, volume_count));
    }

    /// Determine the cutoff year and total volume count
    ///
    /// A window which was never filled up still has empty slots, which stand
    /// for year 0 and no volume. The cutoff year is then 0, so that no data
    /// file entry is considered too old.
    pub fn finish(self) -> Totals {
        let total_volumes = self.records.iter().map(|&(_year, count)| count).sum();
        if self.records.len() < self.capacity.get() {
            log::warn!(
                "Only {} yearly records available, fewer than the requested {} years",
                self.records.len(),
                self.capacity
            );
            return Totals {
                cutoff_year: 0,
                total_volumes,
            };
        }
        let &(cutoff_year, _) = self
            .records
            .front()
            .expect("a full window can't be empty since its capacity is nonzero");
        Totals {
            cutoff_year,
            total_volumes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn years(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn keeps_most_recent_years() {
        let text = " \t2000,1,1,1\t2001,1,1,10\t2002,1,1,100\t2003,1,1,1000\t2004,1,1,10000\n";
        assert_eq!(
            parse(text, years(3)),
            Ok(Totals {
                cutoff_year: 2002,
                total_volumes: 11100,
            })
        );
    }

    #[test]
    fn exact_window_keeps_everything() {
        let text = "\t2000,5,5,1\t2001,5,5,2\t2002,5,5,3";
        assert_eq!(
            parse(text, years(3)),
            Ok(Totals {
                cutoff_year: 2000,
                total_volumes: 6,
            })
        );
    }

    #[test]
    fn short_file_keeps_every_year() {
        let text = " \t2003,5,5,3\t2004,5,5,4";
        for num_years in [3, 25] {
            assert_eq!(
                parse(text, years(num_years)),
                Ok(Totals {
                    cutoff_year: 0,
                    total_volumes: 7,
                })
            );
        }
    }

    #[test]
    fn placeholder_only_file_keeps_every_year() {
        let no_volumes = Ok(Totals {
            cutoff_year: 0,
            total_volumes: 0,
        });
        assert_eq!(parse(" \n", years(3)), no_volumes);
        assert_eq!(parse("", years(1)), no_volumes);
    }

    #[test]
    fn accepts_one_record_per_line() {
        let text = "\n2001,1,1,2\n2002,1,1,3\n";
        assert_eq!(
            parse(text, years(1)),
            Ok(Totals {
                cutoff_year: 2002,
                total_volumes: 3,
            })
        );
    }

    #[test]
    fn first_record_is_always_skipped() {
        assert_eq!(
            parse("placeholder\t2000,1,1,5", years(2)),
            Ok(Totals {
                cutoff_year: 2000,
                total_volumes: 5,
            })
        );
    }

    #[test]
    fn rejects_malformed_totals() {
        assert_eq!(
            parse(" \t2000,1,1", years(3)),
            Err(ParseError::FieldCount {
                expected: 4,
                found: 3
            })
        );
        assert!(matches!(
            parse(" \t2000,1,1,many", years(3)),
            Err(ParseError::Number {
                field: "volume count",
                ..
            })
        ));
    }

    #[test]
    fn window_evicts_oldest_record() {
        let mut window = YearWindow::new(years(2));
        window.push(1990, 1);
        window.push(1991, 2);
        window.push(1992, 4);
        assert_eq!(
            window.finish(),
            Totals {
                cutoff_year: 1991,
                total_volumes: 6,
            }
        );
    }
}
