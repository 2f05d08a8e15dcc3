//! Parser diagnostics.

use std::error::Error;
use std::fmt;

/// A single diagnostic recorded while parsing.
///
/// The parser never aborts on these; it records the message, skips to the
/// next statement boundary and keeps going, so one parse can report several.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ParseError {
    /// The token after the current one is not what the grammar requires.
    UnexpectedToken { expected: String, got: String },
    /// No expression can start with this token.
    NoPrefixParseFn(String),
    /// An integer literal that does not fit in 64 bits.
    BadIntLiteral(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedToken { expected, got } => write!(
                f,
                "expected next token to be {}, got {} instead",
                expected, got
            ),
            ParseError::NoPrefixParseFn(kind) => {
                write!(f, "no prefix parse function for {} found", kind)
            }
            ParseError::BadIntLiteral(literal) => {
                write!(f, "could not parse \"{}\" as integer", literal)
            }
        }
    }
}

impl Error for ParseError {}

/// All diagnostics from one parse, in source order. Never empty when
/// returned as an error.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ParseErrors(pub Vec<ParseError>);

impl fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
            first = false;
        }
        Ok(())
    }
}

impl Error for ParseErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            ParseError::UnexpectedToken {
                expected: "=".to_string(),
                got: "INT".to_string(),
            }
            .to_string(),
            "expected next token to be =, got INT instead"
        );
        assert_eq!(
            ParseError::NoPrefixParseFn("!=".to_string()).to_string(),
            "no prefix parse function for != found"
        );
        assert_eq!(
            ParseError::BadIntLiteral("99999999999999999999".to_string()).to_string(),
            "could not parse \"99999999999999999999\" as integer"
        );
    }

    #[test]
    fn error_list_prints_one_per_line() {
        let errors = ParseErrors(vec![
            ParseError::NoPrefixParseFn(";".to_string()),
            ParseError::NoPrefixParseFn("EOF".to_string()),
        ]);
        assert_eq!(
            errors.to_string(),
            "no prefix parse function for ; found\nno prefix parse function for EOF found"
        );
    }
}
