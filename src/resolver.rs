//! The process-wide mnemonic table and the entry points the tokenizer calls.
//!
//! The table is generated from [Vocabulary::builtin] the first time any of these functions is
//! called and never changes afterwards, so lookups can run from any number of threads.

use lazy_static::lazy_static;

use crate::generator::Generator;
use crate::mnemonic::Mnemonic;
use crate::table::KeywordTable;
use crate::vocabulary::Vocabulary;

lazy_static! {
    static ref VOCABULARY: Vocabulary<Mnemonic> = Vocabulary::builtin();
    static ref TABLE: KeywordTable<Mnemonic> = Generator::default()
        .generate(&VOCABULARY)
        .expect("the builtin vocabulary has a perfect hash");
}

/// The builtin mnemonic vocabulary.
pub fn vocabulary() -> &'static Vocabulary<Mnemonic> {
    &VOCABULARY
}

/// The builtin mnemonic table.
pub fn table() -> &'static KeywordTable<Mnemonic> {
    &TABLE
}

/// Resolves the token `word` to a mnemonic.
///
/// The comparison is exact and case sensitive. Every input, including empty and overlong
/// ones, gives either a mnemonic or [Mnemonic::Invalid].
///
/// ```
/// use mnemonic_hash::{resolver::resolve, Mnemonic};
///
/// assert_eq!(resolve(b"blgt"), Mnemonic::Blgt);
/// assert_eq!(resolve(b"BLGT"), Mnemonic::Invalid);
/// ```
pub fn resolve(word: &[u8]) -> Mnemonic {
    TABLE.lookup(word)
}

pub fn resolve_str(word: &str) -> Mnemonic {
    resolve(word.as_bytes())
}

/// Resolves the first `len` bytes of `buffer`. A `len` past the end of `buffer` is
/// [Mnemonic::Invalid].
pub fn resolve_span(buffer: &[u8], len: usize) -> Mnemonic {
    match buffer.get(..len) {
        Some(word) => resolve(word),
        None => Mnemonic::Invalid,
    }
}

/// Resolves the bytes of `buffer` up to its first NUL, or all of it if there is none.
pub fn resolve_nul_terminated(buffer: &[u8]) -> Mnemonic {
    let len = buffer.iter().position(|b| *b == 0).unwrap_or(buffer.len());

    resolve(&buffer[..len])
}

/// The closest builtin mnemonic to an unrecognized `word`, for diagnostics.
pub fn suggest(word: &str) -> Option<Mnemonic> {
    VOCABULARY.suggest(word, 1).map(|entry| entry.code())
}
