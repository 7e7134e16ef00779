//! [KeywordTable]: the slot table and the verified lookup.

use std::fmt;

use crate::generator::{GenerateError, Generator};
use crate::hash::AssociationTable;
use crate::vocabulary::{Code, Entry, Vocabulary};

/// A perfect-hash table over a [Vocabulary].
///
/// Every entry sits in the slot its text hashes to and no two entries share a slot. Lookups
/// never allocate and never fail: unrecognized input yields [Code::INVALID].
#[derive(Clone, Debug)]
pub struct KeywordTable<C> {
    association: AssociationTable,
    slots: Vec<Option<Entry<C>>>,
    min_word_length: usize,
    max_word_length: usize,
    min_hash_value: usize,
    total_keywords: usize,
}

/// Figures describing a [KeywordTable].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableStats {
    pub total_keywords: usize,
    pub min_word_length: usize,
    pub max_word_length: usize,
    pub min_hash_value: usize,
    pub max_hash_value: usize,
}

impl TableStats {
    /// Number of slots between the lowest and the highest occupied slot, inclusive.
    pub fn key_range(&self) -> usize {
        self.max_hash_value - self.min_hash_value + 1
    }
}

impl fmt::Display for TableStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "TOTAL_KEYWORDS  {}", self.total_keywords)?;
        writeln!(f, "MIN_WORD_LENGTH {}", self.min_word_length)?;
        writeln!(f, "MAX_WORD_LENGTH {}", self.max_word_length)?;
        writeln!(f, "MIN_HASH_VALUE  {}", self.min_hash_value)?;
        writeln!(f, "MAX_HASH_VALUE  {}", self.max_hash_value)?;
        write!(f, "maximum key range = {}, duplicates = 0", self.key_range())
    }
}

impl<C: Code> KeywordTable<C> {
    /// Builds a table for `vocabulary` with the default [Generator].
    pub fn build(vocabulary: &Vocabulary<C>) -> Result<KeywordTable<C>, GenerateError> {
        Generator::default().generate(vocabulary)
    }

    /// Places every entry of `vocabulary` in the slot `association` hashes it to.
    ///
    /// Fails if two entries land in the same slot.
    pub fn from_parts(
        vocabulary: &Vocabulary<C>,
        association: AssociationTable,
    ) -> Result<KeywordTable<C>, GenerateError> {
        let hashes: Vec<usize> = vocabulary
            .iter()
            .map(|entry| association.hash(entry.text().as_bytes()))
            .collect();

        let max_hash_value = hashes.iter().copied().max().unwrap_or(0);
        let min_hash_value = hashes.iter().copied().min().unwrap_or(0);

        let mut slots: Vec<Option<Entry<C>>> = vec![None; max_hash_value + 1];

        for (entry, hash) in vocabulary.iter().zip(hashes) {
            if let Some(other) = &slots[hash] {
                return Err(GenerateError::Collision {
                    first: other.text().to_string(),
                    second: entry.text().to_string(),
                    slot: hash,
                });
            }

            slots[hash] = Some(entry.clone());
        }

        Ok(KeywordTable {
            association,
            slots,
            min_word_length: vocabulary.min_text_length(),
            max_word_length: vocabulary.max_text_length(),
            min_hash_value,
            total_keywords: vocabulary.len(),
        })
    }

    /// Resolves `word` to its code, or [Code::INVALID] if it is not in the vocabulary.
    pub fn lookup(&self, word: &[u8]) -> C {
        match self.get(word) {
            Some(entry) => entry.code(),
            None => C::INVALID,
        }
    }

    /// Finds the entry whose text is exactly `word`.
    pub fn get(&self, word: &[u8]) -> Option<&Entry<C>> {
        if word.len() < self.min_word_length || word.len() > self.max_word_length {
            return None;
        }

        let key = self.association.hash(word);

        if key > self.max_hash_value() {
            return None;
        }

        // The hash is only collision free among vocabulary words, anything else can still land
        // on an occupied slot.
        match &self.slots[key] {
            Some(entry) if entry.text().as_bytes() == word => Some(entry),
            _ => None,
        }
    }

    /// Re-checks that every placed entry is found by [KeywordTable::get].
    pub fn verify(&self) -> Result<(), GenerateError> {
        for (slot, entry) in self.entries() {
            let found = self.get(entry.text().as_bytes()).map(Entry::code);

            if found != Some(entry.code()) {
                return Err(GenerateError::Unreachable {
                    text: entry.text().to_string(),
                });
            }

            if self.association.hash(entry.text().as_bytes()) != slot {
                return Err(GenerateError::Unreachable {
                    text: entry.text().to_string(),
                });
            }
        }

        Ok(())
    }
}

impl<C> KeywordTable<C> {
    pub fn association(&self) -> &AssociationTable {
        &self.association
    }

    /// The hash of `word` under this table's association values.
    pub fn hash(&self, word: &[u8]) -> usize {
        self.association.hash(word)
    }

    /// The slot at `index`. `None` both for empty slots and for indices past the table.
    pub fn slot(&self, index: usize) -> Option<&Entry<C>> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn slots(&self) -> &[Option<Entry<C>>] {
        &self.slots
    }

    /// Occupied slots and their indices, in slot order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &Entry<C>)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|entry| (index, entry)))
    }

    pub fn total_keywords(&self) -> usize {
        self.total_keywords
    }

    pub fn min_word_length(&self) -> usize {
        self.min_word_length
    }

    pub fn max_word_length(&self) -> usize {
        self.max_word_length
    }

    pub fn min_hash_value(&self) -> usize {
        self.min_hash_value
    }

    pub fn max_hash_value(&self) -> usize {
        self.slots.len() - 1
    }

    pub fn stats(&self) -> TableStats {
        TableStats {
            total_keywords: self.total_keywords,
            min_word_length: self.min_word_length,
            max_word_length: self.max_word_length,
            min_hash_value: self.min_hash_value,
            max_hash_value: self.max_hash_value(),
        }
    }
}
