//! Early filtering of data file entries

use super::Entry;
use crate::Year;

/// Build the year filter
///
/// Data file entries go through this filter right after parsing, so that
/// entries recorded before the time window of interest never reach the
/// aggregation stage.
pub fn make_year_filter(cutoff_year: Year) -> impl FnMut(&Entry) -> bool {
    move |entry| {
        let keep = entry.year >= cutoff_year;
        if !keep {
            log::trace!("Rejected {entry:?} because it's older than {cutoff_year}");
        }
        keep
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_cutoff_year_and_later() {
        let mut filter = make_year_filter(2000);
        let entry = |year| Entry {
            word: "word".into(),
            year,
            match_count: 1,
            volume_count: 1,
        };
        assert!(!filter(&entry(1999)));
        assert!(filter(&entry(2000)));
        assert!(filter(&entry(2012)));
    }
}
