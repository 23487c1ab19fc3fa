//! Word to volume count tables, per data file and across the whole dataset

use crate::{tsv::Entry, VolumeCount, Word};
use std::collections::{hash_map, HashMap};

/// Accumulator for entries from a single data file
///
/// Volume counts are first summed over the years of each exact (tagged)
/// word. Once you're done with an input file, call
/// [`finish_file()`](Self::finish_file) to strip part-of-speech tags and get
/// the final [`FileDictionary`].
#[derive(Debug, Default)]
pub struct FileDictionaryBuilder {
    /// Last seen word, if any, and volume count accumulated so far
    current_word_and_count: Option<(Word, VolumeCount)>,

    /// Volume counts from previous words, keyed by exact word
    raw_counts: HashMap<Word, VolumeCount>,
}
//
impl FileDictionaryBuilder {
    /// Set up the accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Integrate a new dataset entry
    ///
    /// Data files are sorted by word, so consecutive entries usually refer to
    /// the same word and are summed without a hash table lookup. Unsorted
    /// input is still aggregated correctly, only slower.
    pub fn add_entry(&mut self, entry: Entry) {
        if let Some((word, count)) = &mut self.current_word_and_count {
            if *word == entry.word {
                *count += entry.volume_count;
                return;
            }
        }
        self.switch_word(Some((entry.word, entry.volume_count)));
    }

    /// Export the file dictionary
    ///
    /// Words are normalized by removing their part-of-speech tag. When several
    /// tagged variants of a word collide, the largest volume count is kept:
    /// the same book may contain several variants, so summing would overcount.
    pub fn finish_file(mut self) -> FileDictionary {
        self.switch_word(None);
        let mut words = HashMap::with_capacity(self.raw_counts.len());
        for (raw_word, count) in self.raw_counts {
            let word = strip_pos_tag(raw_word);
            match words.entry(word) {
                hash_map::Entry::Occupied(o) => {
                    let o = o.into_mut();
                    log::trace!("Merging volume count {count} into existing count {o}");
                    *o = count.max(*o);
                }
                hash_map::Entry::Vacant(v) => {
                    v.insert(count);
                }
            }
        }
        FileDictionary(words)
    }

    /// Record the current word's volume count and switch to a different word
    /// (or none at all)
    fn switch_word(&mut self, new_word_and_count: Option<(Word, VolumeCount)>) {
        if let Some((former_word, former_count)) =
            std::mem::replace(&mut self.current_word_and_count, new_word_and_count)
        {
            *self.raw_counts.entry(former_word).or_insert(0) += former_count;
        }
    }
}

/// Remove the part-of-speech tag from a word, if any
///
/// Everything from the first underscore onwards is considered to be a tag,
/// e.g. `ran_VBD` becomes `ran`.
pub fn strip_pos_tag(word: Word) -> Word {
    match word.find('_') {
        Some(idx) => {
            let stripped: Word = word[..idx].into();
            log::trace!("Normalized tagged word {word:?} into untagged form {stripped:?}");
            stripped
        }
        None => word,
    }
}

/// Volume counts of the normalized words of one data file
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FileDictionary(HashMap<Word, VolumeCount>);
//
impl FileDictionary {
    /// Number of distinct words
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Volume count of a word
    #[cfg(test)]
    pub fn get(&self, word: &str) -> Option<VolumeCount> {
        self.0.get(word).copied()
    }
}

/// Volume counts of the normalized words of all data files
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Dictionary(HashMap<Word, VolumeCount>);
//
impl Dictionary {
    /// Create an empty dictionary
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge data from another file
    ///
    /// A word which is already present gets its volume count replaced by the
    /// one from the new file. Counts from different files are not summed.
    pub fn merge(&mut self, file: FileDictionary) {
        self.0.extend(file.0);
    }

    /// Number of distinct words
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Volume count of a word
    #[cfg(test)]
    pub fn get(&self, word: &str) -> Option<VolumeCount> {
        self.0.get(word).copied()
    }

    /// Words and their volume counts, in unspecified order
    pub fn words(&self) -> &HashMap<Word, VolumeCount> {
        &self.0
    }
}
//
impl FromIterator<(Word, VolumeCount)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (Word, VolumeCount)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
