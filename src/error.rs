//! Parse error taxonomy
//!
//! Every malformed construct maps to one [`ErrorKind`]; the surrounding
//! [`ParseError`] carries the byte offset of the offending construct.
//! There is no recovery: the first error aborts the parse.

use std::error::Error as StdError;
use std::fmt;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, ParseError>;

/// What went wrong
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Input ended, or a required terminator never appeared, inside the
    /// named construct
    UnexpectedEndOfInput(&'static str),
    /// Attribute name not followed by `=`
    MissingEquals,
    /// `=` not followed by a single or double quote
    MissingQuote,
    /// Opening quote with no matching closing quote before end of input
    UnterminatedAttributeValue,
    /// Entity reference whose body is not `lt`, `gt`, `amp`, or a valid
    /// numeric character reference
    UnknownEntity(String),
    /// Name prefix with no binding in any enclosing scope
    UnresolvedNamespacePrefix(String),
    /// Attribute name starting with `xml` that is none of the recognized
    /// reserved forms (`xmlns`, `xmlns:*`, `xml:*`)
    InvalidReservedAttribute(String),
    /// `<!` not followed by a comment, CDATA section, or DOCTYPE
    UnknownMarkupConstruct,
}

/// A fatal parse failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ErrorKind,
    /// Byte offset into the input where the construct went wrong
    pub offset: usize,
}

impl ParseError {
    pub fn new(kind: ErrorKind, offset: usize) -> Self {
        ParseError { kind, offset }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::UnexpectedEndOfInput(context) => {
                write!(f, "unexpected end of input in {context}")?
            }
            ErrorKind::MissingEquals => f.write_str("'=' expected after attribute name")?,
            ErrorKind::MissingQuote => f.write_str("quote expected after '='")?,
            ErrorKind::UnterminatedAttributeValue => {
                f.write_str("unterminated attribute value")?
            }
            ErrorKind::UnknownEntity(name) => write!(f, "unknown entity: {name}")?,
            ErrorKind::UnresolvedNamespacePrefix(prefix) => {
                write!(f, "unknown namespace prefix: {prefix:?}")?
            }
            ErrorKind::InvalidReservedAttribute(name) => {
                write!(f, "invalid reserved attribute: {name}")?
            }
            ErrorKind::UnknownMarkupConstruct => {
                f.write_str("unrecognized markup after '<!'")?
            }
        }
        write!(f, " at byte {}", self.offset)
    }
}

impl StdError for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_offset() {
        let err = ParseError::new(ErrorKind::MissingEquals, 17);
        assert_eq!(err.to_string(), "'=' expected after attribute name at byte 17");
    }

    #[test]
    fn test_display_entity_name() {
        let err = ParseError::new(ErrorKind::UnknownEntity("bogus".to_string()), 3);
        assert_eq!(err.to_string(), "unknown entity: bogus at byte 3");
    }

    #[test]
    fn test_error_is_std_error() {
        fn takes_error(_: &dyn std::error::Error) {}
        takes_error(&ParseError::new(ErrorKind::UnknownMarkupConstruct, 0));
    }
}
