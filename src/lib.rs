//! A crate for resolving assembler mnemonics and directives with a perfect hash.
//!
//! The tokenizer of an assembler hands over every identifier-like token it finds, and this
//! crate answers in constant time whether the token is one of the known mnemonics (`ld`, `add`,
//! `blgt`, ...) or directives (`word`, `align`, ...) and which one.
//!
//! Currently this crate provides the functionality to:
//! - Resolve tokens against the builtin mnemonic vocabulary ([resolver]).
//! - Validate vocabularies and read them from definition files ([vocabulary], [definition]).
//! - Generate collision-free hash tables for any vocabulary ([generator], [table]).
//! - Emit generated tables as Rust source ([codegen]).
//! - Suggest the closest mnemonic for a misspelled token.
//!
//! # How lookups work
//!
//! The hash of a token is its length plus the association values of its first four bytes.
//! The association values are searched for once, so that every vocabulary word lands in a
//! slot of its own. A lookup checks the length, hashes, fetches the slot and compares the
//! slot's text with the token. The comparison is what rejects tokens that are not in the
//! vocabulary but happen to hash into an occupied slot.
//!
//! # Example
//! ```
//! use mnemonic_hash::{resolver, Mnemonic};
//!
//! assert_eq!(resolver::resolve(b"ldsh"), Mnemonic::Ldsh);
//! assert_eq!(resolver::resolve_str("align"), Mnemonic::Align);
//!
//! // Mnemonics are case sensitive, folding case is up to the tokenizer.
//! assert_eq!(resolver::resolve(b"LDSH"), Mnemonic::Invalid);
//! assert_eq!(resolver::suggest("LDSH"), Some(Mnemonic::Ldsh));
//! ```
//!
//! # Executables
//!
//! ## `mnemonic`
//!
//! Built with the `tools` feature. Resolves words, prints table statistics, emits generated
//! tables and checks definition files.
//!
//! ```text
//! $ mnemonic resolve blgt ldx
//! blgt    72
//! ldx     invalid (did you mean 'ld'?)
//! ```
pub mod codegen;
pub mod definition;
pub mod error;
pub mod generator;
pub mod hash;
pub mod mnemonic;
pub mod resolver;
mod suggest;
pub mod table;
pub mod vocabulary;

pub use mnemonic::{Condition, Mnemonic};
pub use table::KeywordTable;
pub use vocabulary::{Code, Entry, Vocabulary};
