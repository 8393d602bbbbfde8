//! Tag name and attribute extraction
//!
//! Scans the interior of a start tag, end tag, or processing
//! instruction: one name followed by zero or more `name="value"` /
//! `name='value'` pairs. Values are entity-decoded here; names are kept
//! raw for the caller to resolve.

use super::entities::decode_text;
use super::scanner::{is_space, Scanner};
use crate::error::{ErrorKind, ParseError, Result};
use std::borrow::Cow;

/// An attribute as written: raw name, decoded value
#[derive(Debug, Clone, PartialEq)]
pub struct RawAttribute<'a> {
    pub name: &'a str,
    pub value: Cow<'a, str>,
}

/// The scanned interior of a tag
#[derive(Debug)]
pub struct TagContent<'a> {
    /// Name as written (may be empty for degenerate input like `<>`)
    pub name: &'a str,
    /// Attributes in document order
    pub attributes: Vec<RawAttribute<'a>>,
    /// Bytes consumed from `start` up to (not including) the terminator
    pub consumed: usize,
}

/// Scan a tag interior beginning at `start`, the offset just past `<`,
/// `</`, or `<?`
///
/// The name takes characters up to ASCII whitespace, `>`, `/`, or `?`.
/// Attribute names stop only at whitespace or `=`, so characters like
/// `/` stay part of the name. The terminator itself is never consumed;
/// the caller inspects the input at `start + consumed`.
pub fn scan_tag(input: &str, start: usize) -> Result<TagContent<'_>> {
    let mut scanner = Scanner::new(input);
    scanner.set_position(start);

    let name_start = scanner.position();
    while let Some(b) = scanner.peek() {
        if is_space(b) || matches!(b, b'>' | b'/' | b'?') {
            break;
        }
        scanner.advance(1);
    }
    let name = scanner.slice(name_start, scanner.position());
    scanner.skip_whitespace();

    let mut attributes = Vec::new();
    while let Some(b) = scanner.peek() {
        if matches!(b, b'>' | b'/' | b'?') {
            break;
        }

        let attr_start = scanner.position();
        while let Some(b) = scanner.peek() {
            if is_space(b) || b == b'=' {
                break;
            }
            scanner.advance(1);
        }
        let attr_name = scanner.slice(attr_start, scanner.position());
        scanner.skip_whitespace();

        if scanner.peek() != Some(b'=') {
            return Err(ParseError::new(ErrorKind::MissingEquals, scanner.position()));
        }
        scanner.advance(1);
        scanner.skip_whitespace();

        let quote = match scanner.peek() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return Err(ParseError::new(ErrorKind::MissingQuote, scanner.position())),
        };
        let quote_pos = scanner.position();
        scanner.advance(1);
        let value_end = scanner.find_byte(quote).ok_or_else(|| {
            ParseError::new(ErrorKind::UnterminatedAttributeValue, quote_pos)
        })?;
        let raw_value = scanner.slice(quote_pos + 1, value_end);
        let value = decode_text(raw_value, quote_pos + 1)?;
        attributes.push(RawAttribute { name: attr_name, value });
        scanner.set_position(value_end + 1);
        scanner.skip_whitespace();
    }

    Ok(TagContent {
        name,
        attributes,
        consumed: scanner.position() - start,
    })
}
