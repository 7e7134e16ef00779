//! "Did you mean" lookups for unrecognized tokens.

use edit_distance::edit_distance;

use crate::vocabulary::{Code, Entry, Vocabulary};

impl<C: Code> Vocabulary<C> {
    /// Finds the entry closest to `text`.
    ///
    /// An entry that differs from `text` only in ASCII case wins outright. Otherwise the entry
    /// with the smallest edit distance, at most `max_distance`, is returned. Ties go to the
    /// entry that comes first in the vocabulary.
    pub fn suggest(&self, text: &str, max_distance: usize) -> Option<&Entry<C>> {
        if let Some(entry) = self.iter().find(|e| e.text().eq_ignore_ascii_case(text)) {
            return Some(entry);
        }

        self.iter()
            .map(|entry| (edit_distance(entry.text(), text), entry))
            .filter(|(distance, _)| *distance <= max_distance)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, entry)| entry)
    }
}

#[cfg(test)]
mod tests {
    use crate::mnemonic::Mnemonic;
    use crate::vocabulary::Vocabulary;

    #[test]
    fn test_case_mismatch_wins() {
        let vocabulary = Vocabulary::builtin();

        assert_eq!(
            vocabulary.suggest("ALIGN", 0).map(|e| e.code()),
            Some(Mnemonic::Align)
        );
    }

    #[test]
    fn test_closest_entry() {
        let vocabulary = Vocabulary::builtin();

        assert_eq!(vocabulary.suggest("ascci", 1).map(|e| e.code()), Some(Mnemonic::Ascii));
        assert_eq!(vocabulary.suggest("pusj", 1).map(|e| e.code()), Some(Mnemonic::Push));
        assert_eq!(vocabulary.suggest("mvoe", 1), None);
    }

    #[test]
    fn test_ties_follow_vocabulary_order() {
        let vocabulary = Vocabulary::builtin();

        // "stx" is one edit from "st", "stb" and "sth".
        assert_eq!(vocabulary.suggest("stx", 1).map(|e| e.code()), Some(Mnemonic::St));
    }
}
