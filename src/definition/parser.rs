use std::fmt;
use std::result::Result as StdResult;
use std::str::FromStr;

use nom::{
    IResult,
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, line_ending, not_line_ending, space0},
    combinator::{map, opt},
    error::context,
    sequence::{preceded, terminated, tuple},
};

use crate::vocabulary::{Code, Entry, Vocabulary, VocabularyError};

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// The code type does not know the code name.
    UnknownCode(String),

    /// The entries parsed, but do not form a valid vocabulary.
    Vocabulary(VocabularyError),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::UnknownCode(name) => write!(f, "unknown code '{}'", name),
            ErrorKind::Vocabulary(err) => write!(f, "invalid vocabulary: {}", err),
        }
    }
}

pub type ParseError = crate::error::ParseError<ErrorKind>;
type Result<'a, T> = IResult<&'a str, T, ParseError>;

fn is_word_character(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

fn sp(input: &str) -> Result<&str> {
    space0(input)
}

fn word(input: &str) -> Result<&str> {
    take_while1(is_word_character)(input)
}

fn separator(input: &str) -> Result<()> {
    map(tuple((sp, char(','), sp)), |_| ())(input)
}

fn comment(input: &str) -> Result<&str> {
    preceded(char('#'), not_line_ending)(input)
}

fn end_of_input(input: &str) -> Result<&str> {
    if input.is_empty() {
        Ok((input, input))
    } else {
        Err(nom::Err::Error(nom::error::ParseError::from_error_kind(
            input,
            nom::error::ErrorKind::Eof,
        )))
    }
}

fn end_of_line(input: &str) -> Result<()> {
    map(
        tuple((sp, opt(comment), alt((line_ending, end_of_input)))),
        |_| (),
    )(input)
}

/// An entry as the text, the code and the input the entry starts at.
type Parsed<'a, C> = (&'a str, C, &'a str);

fn entry<C: FromStr>(input: &str) -> Result<Parsed<C>> {
    let (input, _) = sp(input)?;
    let (after_text, text) = word(input)?;
    let (after_separator, has_code) = opt(separator)(after_text)?;

    let (rest, name, name_input) = match has_code {
        Some(()) => {
            let (rest, name) = word(after_separator)?;
            (rest, name, after_separator)
        }
        None => (after_text, text, input),
    };

    match C::from_str(name) {
        Ok(code) => Ok((rest, (text, code, input))),
        Err(_) => Err(nom::Err::Failure(ParseError::from_kind(
            name_input,
            ErrorKind::UnknownCode(name.to_string()),
        ))),
    }
}

fn definition<C: FromStr>(mut input: &str) -> Result<Vec<Parsed<C>>> {
    let mut entries = Vec::new();

    while !input.is_empty() {
        let (rest, entry) = context("entry", terminated(opt(entry::<C>), end_of_line))(input)?;

        entries.extend(entry);
        input = rest;
    }

    Ok((input, entries))
}

/// Parses a definition file into a [Vocabulary].
///
/// Code names are converted with `C`'s [FromStr] implementation.
pub fn parse_definition<C>(input: &str) -> StdResult<Vocabulary<C>, ParseError>
where
    C: Code + FromStr,
{
    let entries = match definition::<C>(input) {
        Ok((_, entries)) => entries,
        Err(nom::Err::Error(err)) | Err(nom::Err::Failure(err)) => return Err(err),
        Err(nom::Err::Incomplete(_)) => return Err(ParseError::incomplete()),
    };

    let vocabulary = entries
        .iter()
        .map(|(text, code, _)| Entry::new(*text, *code))
        .collect();

    Vocabulary::new(vocabulary).map_err(|err| {
        let at = offending_entry(&entries, &err).unwrap_or("");

        ParseError::from_kind(at, ErrorKind::Vocabulary(err))
    })
}

/// The input at the start of the entry `err` complains about.
fn offending_entry<'a, C>(entries: &[Parsed<'a, C>], err: &VocabularyError) -> Option<&'a str> {
    let (text, occurrence) = match err {
        VocabularyError::Empty => return None,
        // The second occurrence is the duplicate.
        VocabularyError::DuplicateText { text } => (text, 1),
        VocabularyError::DuplicateCode { second, .. } => (second, 0),
        VocabularyError::Length { text }
        | VocabularyError::ContainsNul { text }
        | VocabularyError::InvalidCode { text } => (text, 0),
    };

    entries
        .iter()
        .filter(|(t, _, _)| *t == text.as_str())
        .nth(occurrence)
        .map(|(_, _, input)| *input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mnemonic::Mnemonic;

    #[test]
    fn test_entries_and_comments() {
        let source = "# loads\nld\n\n  ldb, ldb   # byte\nldh,ldh\n\t# done";
        let vocabulary = parse_definition::<Mnemonic>(source).unwrap();

        let entries: Vec<_> = vocabulary.iter().map(|e| (e.text(), e.code())).collect();

        assert_eq!(
            entries,
            vec![("ld", Mnemonic::Ld), ("ldb", Mnemonic::Ldb), ("ldh", Mnemonic::Ldh)]
        );
    }

    #[test]
    fn test_code_differs_from_text() {
        let vocabulary = parse_definition::<Mnemonic>("st, stb\n").unwrap();

        assert_eq!(vocabulary.find(b"st").map(|e| e.code()), Some(Mnemonic::Stb));
    }

    #[test]
    fn test_crlf_line_endings() {
        let vocabulary = parse_definition::<Mnemonic>("b\r\nbl\r\n").unwrap();

        assert_eq!(vocabulary.len(), 2);
    }

    #[test]
    fn test_unknown_code() {
        let source = "ld\nst, store\n";
        let err = parse_definition::<Mnemonic>(source).unwrap_err();

        assert_eq!(err.kind(), Some(&ErrorKind::UnknownCode("store".to_string())));

        let verbose = err.verbose(source);
        assert_eq!((verbose.line, verbose.column), (2, 5));
    }

    #[test]
    fn test_trailing_garbage() {
        let source = "ld\nst st\n";
        let verbose = parse_definition::<Mnemonic>(source).unwrap_err().verbose(source);

        assert_eq!((verbose.line, verbose.column), (2, 4));
    }

    #[test]
    fn test_vocabulary_errors() {
        let err = parse_definition::<Mnemonic>("ld\nld\n").unwrap_err();

        assert_eq!(
            err.kind(),
            Some(&ErrorKind::Vocabulary(VocabularyError::DuplicateText {
                text: "ld".to_string()
            }))
        );

        let err = parse_definition::<Mnemonic>("# nothing\n").unwrap_err();
        assert_eq!(err.kind(), Some(&ErrorKind::Vocabulary(VocabularyError::Empty)));
    }

    #[test]
    fn test_vocabulary_error_locations() {
        let cases = vec![
            ("ld\nst\n  ld\n", 3, 3),
            ("ld\nst\ntoolong, ldb\n", 3, 1),
            ("ld\n# loads\nload, ld\n", 3, 1),
        ];

        for (source, line, column) in cases {
            let err = parse_definition::<Mnemonic>(source).unwrap_err();
            assert!(match err.kind() {
                Some(ErrorKind::Vocabulary(_)) => true,
                _ => false,
            });

            let verbose = err.verbose(source);
            assert_eq!((verbose.line, verbose.column), (line, column), "{:?}", source);
        }
    }

    #[test]
    fn test_errors_name_the_entry() {
        let source = "ld\nst st\n";
        let err = parse_definition::<Mnemonic>(source).unwrap_err();

        assert_eq!(err.context(), Some("entry"));
        assert!(err.verbose(source).to_string().ends_with("(in entry)"));

        let err = parse_definition::<Mnemonic>("ld, store\n").unwrap_err();
        assert_eq!(err.context(), Some("entry"));
    }
}
