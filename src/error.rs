//! Domain parse error.

use std::error;
use std::fmt;

use crate::idna::IdnaError;

/// Domain parse error.
///
/// The message always names the violated rule or the offending character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Error kind.
    kind: ErrorKind,
}

impl ParseError {
    /// Creates a new `ParseError`.
    ///
    /// For internal use.
    #[inline]
    #[must_use]
    pub(crate) fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    /// Returns the error kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::EmptyInput => f.write_str("input is empty"),
            ErrorKind::Idna(e) => f.write_str(e.message()),
            ErrorKind::IllegalCharacter(c) => {
                f.write_str("Illegal character in domain: ")?;
                match c {
                    ' ' => f.write_str("space is not allowed"),
                    '\t' => f.write_str("tab is not allowed"),
                    '\n' => f.write_str("line break is not allowed"),
                    '\r' => f.write_str("carriage return is not allowed"),
                    c => write!(f, "\u{201C}{}\u{201D} is not allowed", c),
                }
            }
        }
    }
}

impl error::Error for ParseError {}

impl From<ErrorKind> for ParseError {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Domain parse error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The input is empty.
    EmptyInput,
    /// The IDNA conversion reported a fatal violation.
    Idna(IdnaError),
    /// The ASCII form contains a forbidden host code point.
    IllegalCharacter(char),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let msg = |kind| ParseError::new(kind).to_string();
        assert_eq!(msg(ErrorKind::EmptyInput), "input is empty");
        assert_eq!(
            msg(ErrorKind::Idna(IdnaError::Punycode)),
            "A label starts with \"xn--\" but does not contain valid Punycode."
        );
        assert_eq!(
            msg(ErrorKind::IllegalCharacter(' ')),
            "Illegal character in domain: space is not allowed"
        );
        assert_eq!(
            msg(ErrorKind::IllegalCharacter('\r')),
            "Illegal character in domain: carriage return is not allowed"
        );
        assert_eq!(
            msg(ErrorKind::IllegalCharacter('#')),
            "Illegal character in domain: \u{201C}#\u{201D} is not allowed"
        );
    }
}
