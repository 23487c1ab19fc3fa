//! Select the top words from the final aggregated dictionary

use crate::{dictionary::Dictionary, VolumeCount};
use rayon::prelude::*;
use std::{cmp::Reverse, collections::BinaryHeap};

/// Word from the final dictionary, along with its inverse document frequency
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RankedEntry<'dict> {
    /// Normalized word
    pub word: &'dict str,

    /// Inverse document frequency
    pub idf: f64,
}

/// Inverse document frequency of a word seen in `volume_count` volumes out of
/// `total_volumes`
///
/// Volume counts below 1 are treated as 1, so that words which were never seen
/// get the highest possible IDF instead of an infinite or undefined one.
pub fn idf(volume_count: VolumeCount, total_volumes: VolumeCount) -> f64 {
    (total_volumes as f64 / volume_count.max(1) as f64).ln()
}

/// Pick the `max_words` words with the highest volume counts
///
/// Words are returned by decreasing volume count, and words with equal volume
/// counts are sorted in increasing byte order, so that the output does not
/// depend on hash table iteration order.
pub fn pick_top_words(
    dictionary: &Dictionary,
    total_volumes: VolumeCount,
    max_words: usize,
) -> Vec<RankedEntry<'_>> {
    if max_words == 0 {
        return Vec::new();
    }

    // Sorting by this key puts the most common words first
    let keys = (dictionary.words().par_iter()).map(|(word, &count)| (Reverse(count), &**word));

    // Find the top words using max-heaps that pop the worst word...
    let top_words = keys
        // ...first on each thread...
        .fold(BinaryHeap::new, |mut heap, key| {
            heap.push(key);
            if heap.len() > max_words {
                heap.pop();
            }
            heap
        })
        // ...then merge thread results into a global result
        .reduce(BinaryHeap::new, |heap1, heap2| {
            let (mut dst, mut src) = if heap1.len() >= heap2.len() {
                (heap1, heap2)
            } else {
                (heap2, heap1)
            };
            while let Some(key) = src.pop() {
                dst.push(key);
                if dst.len() > max_words {
                    dst.pop();
                }
            }
            dst
        });

    // Collect the results in order of decreasing popularity
    (top_words.into_sorted_vec().into_iter())
        .map(|(Reverse(count), word)| RankedEntry {
            word,
            idf: idf(count, total_volumes),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-3;

    fn dictionary(words: &[(&str, VolumeCount)]) -> Dictionary {
        words
            .iter()
            .map(|&(word, count)| (word.into(), count))
            .collect()
    }

    fn words<'a>(ranked: &[RankedEntry<'a>]) -> Vec<&'a str> {
        ranked.iter().map(|entry| entry.word).collect()
    }

    #[test]
    fn idf_edge_cases() {
        assert!(idf(10, 10).abs() < EPSILON);
        assert!(idf(1, 10) > 1.0);
        assert!(idf(9, 10) > 0.0);
        assert_eq!(idf(0, 10), idf(1, 10));
        // Negative counts are clamped just like zero
        assert_eq!(idf(-1, 10), idf(1, 10));
        assert!((idf(1, 10) - 10f64.ln()).abs() < EPSILON);
    }

    #[test]
    fn ranks_by_decreasing_count() {
        let dictionary = dictionary(&[("b", 2), ("a", 1), ("d", 10), ("c", 5)]);
        let ranked = pick_top_words(&dictionary, 20, 10);
        assert_eq!(words(&ranked), ["d", "c", "b", "a"]);
        assert!((ranked[0].idf - 2f64.ln()).abs() < EPSILON);
        assert!((ranked[3].idf - 20f64.ln()).abs() < EPSILON);
    }

    #[test]
    fn ties_are_broken_by_word() {
        let dictionary = dictionary(&[("pear", 3), ("apple", 3), ("fig", 7), ("kiwi", 3)]);
        let ranked = pick_top_words(&dictionary, 10, 3);
        assert_eq!(words(&ranked), ["fig", "apple", "kiwi"]);
    }

    #[test]
    fn truncates_to_max_words() {
        let many = (0..1000)
            .map(|i| (format!("w{i:04}").into(), i))
            .collect::<Dictionary>();
        let ranked = pick_top_words(&many, 1000, 5);
        assert_eq!(
            words(&ranked),
            ["w0999", "w0998", "w0997", "w0996", "w0995"]
        );
        assert!(pick_top_words(&many, 1000, 0).is_empty());
        assert_eq!(pick_top_words(&many, 1000, 5000).len(), 1000);
    }

    #[test]
    fn non_positive_counts_rank_last_with_max_idf() {
        let dictionary = dictionary(&[("zero", 0), ("neg", -4), ("one", 1)]);
        let ranked = pick_top_words(&dictionary, 100, 10);
        assert_eq!(words(&ranked), ["one", "zero", "neg"]);
        assert!(ranked.iter().all(|entry| entry.idf == idf(1, 100)));
    }
}
