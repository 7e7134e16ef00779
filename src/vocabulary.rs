//! Vocabularies: the closed sets of (text, code) pairs a [KeywordTable](crate::table::KeywordTable)
//! is built from.

use std::fmt;

use itertools::Itertools;

use crate::mnemonic::Mnemonic;

/// Shortest text a vocabulary entry may have.
pub const MIN_TEXT_LENGTH: usize = 1;

/// Longest text a vocabulary entry may have.
pub const MAX_TEXT_LENGTH: usize = 5;

/// A discriminant type that vocabulary entries map to.
///
/// `INVALID` is the value lookups return for unrecognized input. It must never be the code of
/// a vocabulary entry.
pub trait Code: Copy + Eq + fmt::Debug {
    const INVALID: Self;
}

/// A single (text, code) pair.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry<C> {
    text: String,
    code: C,
}

impl<C: Code> Entry<C> {
    pub fn new<S: Into<String>>(text: S, code: C) -> Entry<C> {
        Entry {
            text: text.into(),
            code,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn code(&self) -> C {
        self.code
    }
}

/// Reasons for rejecting a set of entries as a vocabulary.
#[derive(Clone, Debug, PartialEq)]
pub enum VocabularyError {
    /// The vocabulary has no entries.
    Empty,

    /// The text is shorter than [MIN_TEXT_LENGTH] or longer than [MAX_TEXT_LENGTH] bytes.
    Length { text: String },

    /// The text contains a NUL byte.
    ContainsNul { text: String },

    /// Two entries share the same text.
    DuplicateText { text: String },

    /// Two entries share the same code.
    DuplicateCode { first: String, second: String },

    /// The entry uses the reserved invalid code.
    InvalidCode { text: String },
}

impl fmt::Display for VocabularyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            VocabularyError::Empty => write!(f, "vocabulary is empty"),
            VocabularyError::Length { text } => write!(
                f,
                "'{}' is {} bytes long, expected {} to {}",
                text.escape_debug(),
                text.len(),
                MIN_TEXT_LENGTH,
                MAX_TEXT_LENGTH
            ),
            VocabularyError::ContainsNul { text } => {
                write!(f, "'{}' contains a NUL byte", text.escape_debug())
            }
            VocabularyError::DuplicateText { text } => write!(f, "duplicate entry '{}'", text),
            VocabularyError::DuplicateCode { first, second } => {
                write!(f, "'{}' and '{}' have the same code", first, second)
            }
            VocabularyError::InvalidCode { text } => {
                write!(f, "'{}' uses the invalid code", text)
            }
        }
    }
}

impl std::error::Error for VocabularyError {}

/// A validated vocabulary.
///
/// Texts are 1 to 5 bytes long, contain no NUL and are pairwise distinct. Codes are pairwise
/// distinct and never [Code::INVALID]. Entry order is preserved.
#[derive(Clone, Debug, PartialEq)]
pub struct Vocabulary<C> {
    entries: Vec<Entry<C>>,
}

impl<C: Code> Vocabulary<C> {
    pub fn new(entries: Vec<Entry<C>>) -> Result<Vocabulary<C>, VocabularyError> {
        if entries.is_empty() {
            return Err(VocabularyError::Empty);
        }

        for entry in &entries {
            let text = entry.text.clone();

            if entry.text.len() < MIN_TEXT_LENGTH || entry.text.len() > MAX_TEXT_LENGTH {
                return Err(VocabularyError::Length { text });
            }

            if entry.text.contains('\0') {
                return Err(VocabularyError::ContainsNul { text });
            }

            if entry.code == C::INVALID {
                return Err(VocabularyError::InvalidCode { text });
            }
        }

        for (a, b) in entries.iter().tuple_combinations() {
            if a.text == b.text {
                return Err(VocabularyError::DuplicateText {
                    text: a.text.clone(),
                });
            }

            if a.code == b.code {
                return Err(VocabularyError::DuplicateCode {
                    first: a.text.clone(),
                    second: b.text.clone(),
                });
            }
        }

        Ok(Vocabulary { entries })
    }

    pub fn entries(&self) -> &[Entry<C>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<Entry<C>> {
        self.entries.iter()
    }

    /// Length in bytes of the shortest text.
    pub fn min_text_length(&self) -> usize {
        self.entries.iter().map(|e| e.text.len()).min().unwrap_or(0)
    }

    /// Length in bytes of the longest text.
    pub fn max_text_length(&self) -> usize {
        self.entries.iter().map(|e| e.text.len()).max().unwrap_or(0)
    }

    /// Linear search by exact text. Used as the reference the hashed lookup is checked against.
    pub fn find(&self, text: &[u8]) -> Option<&Entry<C>> {
        self.entries.iter().find(|e| e.text.as_bytes() == text)
    }
}

impl Vocabulary<Mnemonic> {
    /// The vocabulary of every [Mnemonic] except [Mnemonic::Invalid].
    pub fn builtin() -> Vocabulary<Mnemonic> {
        let entries = Mnemonic::ALL
            .iter()
            .map(|mnemonic| Entry::new(mnemonic.as_str(), *mnemonic))
            .collect();

        Vocabulary { entries }
    }
}

impl<'a, C> IntoIterator for &'a Vocabulary<C> {
    type Item = &'a Entry<C>;
    type IntoIter = std::slice::Iter<'a, Entry<C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
