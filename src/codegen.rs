//! Emitting a generated [KeywordTable] as Rust source.
//!
//! The output declares the table figures as constants, the association values and the word
//! list as `static` arrays, so a table can be frozen into a crate that does not want to run
//! the generator. Such a crate loads the values with
//! [AssociationTable::from_values](crate::hash::AssociationTable::from_values) and rebuilds the
//! slot table with [KeywordTable::from_parts].

use std::io::{self, Write};

use itertools::Itertools;

use crate::table::KeywordTable;
use crate::vocabulary::Code;

/// Writes `table` as Rust source to `out`.
///
/// `code_path` is prepended to the `Debug` form of every code, e.g. `Mnemonic` turns the code
/// `Ld` into `Mnemonic::Ld`.
pub fn write_rust<C, W>(out: &mut W, table: &KeywordTable<C>, code_path: &str) -> io::Result<()>
where
    C: Code,
    W: Write,
{
    let stats = table.stats();

    writeln!(out, "// Generated by `mnemonic table --rust`.")?;
    writeln!(out, "// maximum key range = {}, duplicates = 0", stats.key_range())?;
    writeln!(out)?;
    writeln!(out, "pub const TOTAL_KEYWORDS: usize = {};", stats.total_keywords)?;
    writeln!(out, "pub const MIN_WORD_LENGTH: usize = {};", stats.min_word_length)?;
    writeln!(out, "pub const MAX_WORD_LENGTH: usize = {};", stats.max_word_length)?;
    writeln!(out, "pub const MIN_HASH_VALUE: usize = {};", stats.min_hash_value)?;
    writeln!(out, "pub const MAX_HASH_VALUE: usize = {};", stats.max_hash_value)?;
    writeln!(out)?;

    let values = table.association().values();

    writeln!(out, "pub static ASSOCIATION_VALUES: [u16; {}] = [", values.len())?;
    for row in &values.iter().chunks(10) {
        writeln!(out, "    {},", row.format(", "))?;
    }
    writeln!(out, "];")?;
    writeln!(out)?;

    writeln!(
        out,
        "pub static WORDLIST: [Option<(&str, {})>; {}] = [",
        code_path,
        table.slots().len()
    )?;
    for slot in table.slots() {
        match slot {
            Some(entry) => writeln!(
                out,
                "    Some(({:?}, {}::{:?})),",
                entry.text(),
                code_path,
                entry.code()
            )?,
            None => writeln!(out, "    None,")?,
        }
    }
    writeln!(out, "];")?;

    Ok(())
}
