//! Error type of the definition file parser.

use std::fmt::{self, Display};

use nom::error::ErrorKind;

#[derive(Debug, Clone, PartialEq)]
enum InnerError<Kind> {
    Incomplete,
    Context(&'static str),
    Other(Kind),
    Nom(ErrorKind),
}

impl<Kind: Display> fmt::Display for InnerError<Kind> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InnerError::Context(ctx) => write!(f, "invalid {}", ctx),
            InnerError::Nom(_err) => write!(f, "unexpected input"),
            InnerError::Other(kind) => fmt::Display::fmt(kind, f),
            InnerError::Incomplete => write!(f, "expected more input"),
        }
    }
}

/// Error type that contains the reason of the error and the unconsumed input.
///
/// The first element of the stack is the innermost error. For line and column information
/// see [ParseError::verbose].
#[derive(Clone, Debug, PartialEq)]
pub struct ParseError<Kind> {
    stack: Vec<(String, InnerError<Kind>)>,
}

impl<Kind> ParseError<Kind> {
    pub(crate) fn from_kind(input: &str, kind: Kind) -> ParseError<Kind> {
        ParseError {
            stack: vec![(input.to_string(), InnerError::Other(kind))],
        }
    }

    pub(crate) fn incomplete() -> ParseError<Kind> {
        ParseError {
            stack: vec![(String::new(), InnerError::Incomplete)],
        }
    }

    /// The outermost context the error passed through, naming the construct being parsed.
    pub fn context(&self) -> Option<&'static str> {
        self.stack.iter().rev().find_map(|(_, inner)| match inner {
            InnerError::Context(ctx) => Some(*ctx),
            _ => None,
        })
    }

    /// The error kind, if the error was raised by the parser itself rather than by `nom`.
    pub fn kind(&self) -> Option<&Kind> {
        self.stack.iter().find_map(|(_, inner)| match inner {
            InnerError::Other(kind) => Some(kind),
            _ => None,
        })
    }
}

/// Error type containing location information in addition to the reason of the error.
///
/// Created from a [ParseError] with [ParseError::verbose].
#[derive(Clone, Debug)]
pub struct VerboseParseError<'a, Kind> {
    /// The line number of the error location.
    pub line: usize,
    /// The column number of the error location.
    pub column: usize,
    /// The construct being parsed, see [ParseError::context].
    pub context: Option<&'static str>,
    kind: InnerError<Kind>,
    rest: &'a str,
}

impl<'a, Kind: Display> fmt::Display for VerboseParseError<'a, Kind> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "at line {} col {}: {}, at '{}'",
            self.line, self.column, self.kind, self.rest
        )?;

        match self.context {
            Some(ctx) => write!(f, " (in {})", ctx),
            None => Ok(()),
        }
    }
}

/// At most 20 characters of `input`, stopping at the first newline.
fn excerpt(input: &str) -> &str {
    let end = input
        .char_indices()
        .take_while(|(_, c)| *c != '\n')
        .take(20)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);

    &input[..end]
}

impl<Kind> ParseError<Kind> {
    /// Calculates the error location information from the [ParseError] and the original input
    /// buffer.
    ///
    /// # Parameters
    /// - `input`: The original input buffer or an exact copy of it.
    pub fn verbose(self, input: &str) -> VerboseParseError<Kind> {
        let context = self.context();
        let (rest, kind) = match self.stack.into_iter().next() {
            Some(innermost) => innermost,
            None => (String::new(), InnerError::Incomplete),
        };

        let offset = input.len().saturating_sub(rest.len());
        let offset = (0..=offset)
            .rev()
            .find(|i| input.is_char_boundary(*i))
            .unwrap_or(0);

        let mut line = 1;
        let mut column = 1;

        for ch in input[..offset].chars() {
            if ch == '\n' {
                line += 1;
                column = 0;
            }

            column += 1;
        }

        VerboseParseError {
            line,
            column,
            context,
            kind,
            rest: excerpt(&input[offset..]),
        }
    }
}

impl<Kind: Display> fmt::Display for ParseError<Kind> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.stack.first() {
            Some((input, kind)) if input.is_empty() => write!(f, "{}", kind),
            Some((input, kind)) => write!(f, "{} at: {}", kind, excerpt(input)),
            None => write!(f, "unknown error"),
        }
    }
}

impl<Kind: fmt::Debug + Display> std::error::Error for ParseError<Kind> {}

impl<Kind> nom::error::ParseError<&str> for ParseError<Kind> {
    fn from_error_kind(input: &str, kind: ErrorKind) -> Self {
        ParseError {
            stack: vec![(input.to_string(), InnerError::Nom(kind))],
        }
    }

    fn append(input: &str, kind: ErrorKind, mut other: Self) -> Self {
        other.stack.push((input.to_string(), InnerError::Nom(kind)));
        other
    }

    fn add_context(input: &str, ctx: &'static str, mut other: Self) -> Self {
        other.stack.push((input.to_string(), InnerError::Context(ctx)));
        other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_location() {
        let input = "ld\nst, st\nbad input here";
        let err = ParseError::from_kind(&input[10..], "oops");
        let verbose = err.verbose(input);

        assert_eq!(verbose.line, 3);
        assert_eq!(verbose.column, 1);
        assert_eq!(verbose.to_string(), "at line 3 col 1: oops, at 'bad input here'");
    }

    #[test]
    fn test_context() {
        use nom::error::ParseError as _;

        let input = "ld\nst st\n";
        let err = ParseError::from_kind(&input[6..], "oops");
        let err = ParseError::add_context(&input[3..], "entry", err);
        let err = ParseError::add_context(input, "definition", err);

        assert_eq!(err.context(), Some("definition"));
        assert_eq!(err.kind(), Some(&"oops"));

        let verbose = err.verbose(input);
        assert_eq!((verbose.line, verbose.column), (2, 4));
        assert_eq!(verbose.to_string(), "at line 2 col 4: oops, at 'st' (in definition)");
    }

    #[test]
    fn test_display_short_input() {
        let err = ParseError::from_kind("ab\ncd", "oops");

        assert_eq!(err.to_string(), "oops at: ab");
        assert_eq!(ParseError::<&str>::incomplete().to_string(), "expected more input");
    }

    #[test]
    fn test_excerpt_is_bounded() {
        assert_eq!(excerpt("abcdefghijklmnopqrstuvwxyz"), "abcdefghijklmnopqrst");
        assert_eq!(excerpt(""), "");
        assert_eq!(excerpt("\nabc"), "");
    }
}
