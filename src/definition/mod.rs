//! Reading vocabularies from definition files.
//!
//! A definition file lists one entry per line, either as `text` or as `text, code`. Blank
//! lines and everything after a `#` are ignored. When the code is left out the text doubles
//! as the code name.
//!
//! ```text
//! # loads
//! ld
//! ldb, ldb
//! ```

mod parser;

pub use self::parser::{parse_definition, ErrorKind, ParseError};
