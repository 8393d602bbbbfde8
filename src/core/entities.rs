//! Entity reference decoding
//!
//! Handles the references allowed in text and attribute values:
//! - Named entities: &lt; &gt; &amp; (only these three)
//! - Numeric character references: &#123; &#x7B; (lowercase x)
//!
//! Anything else between `&` and `;` is a fatal error. A `&` with no
//! later `;`, and the two-character sequence `&;`, pass through
//! verbatim. Uses Cow for zero-copy when no references are present.

use crate::error::{ErrorKind, ParseError, Result};
use memchr::memchr;
use std::borrow::Cow;

/// Decode entity references in text or attribute-value content
///
/// `base` is the byte offset of `input` within the whole document;
/// errors point at the offending `&`. Returns Borrowed when the input
/// contains no `&` at all.
#[inline]
pub fn decode_text(input: &str, base: usize) -> Result<Cow<'_, str>> {
    // Fast path: no references present
    if memchr(b'&', input.as_bytes()).is_none() {
        return Ok(Cow::Borrowed(input));
    }
    decode_entities(input, base).map(Cow::Owned)
}

/// Decode all entity references in the input
fn decode_entities(input: &str, base: usize) -> Result<String> {
    let bytes = input.as_bytes();
    let mut result = String::with_capacity(input.len());
    let mut pos = 0;

    while pos < input.len() {
        if let Some(amp) = memchr(b'&', &bytes[pos..]).map(|i| pos + i) {
            result.push_str(&input[pos..amp]);

            // The body runs to the first ';' after the '&', crossing any
            // further '&' on the way
            match memchr(b';', &bytes[amp + 1..]) {
                None => {
                    // No terminator anywhere ahead, so nothing past this
                    // point can form a reference
                    result.push_str(&input[amp..]);
                    break;
                }
                Some(0) => {
                    // "&;" is not a reference
                    result.push('&');
                    pos = amp + 1;
                }
                Some(len) => {
                    let body = &input[amp + 1..amp + 1 + len];
                    match decode_entity(body) {
                        Some(c) => result.push(c),
                        None => {
                            return Err(ParseError::new(
                                ErrorKind::UnknownEntity(body.to_string()),
                                base + amp,
                            ));
                        }
                    }
                    pos = amp + 1 + len + 1;
                }
            }
        } else {
            // No more references, copy the rest
            result.push_str(&input[pos..]);
            break;
        }
    }

    Ok(result)
}

/// Decode a single entity body (without `&` and `;`)
fn decode_entity(body: &str) -> Option<char> {
    if let Some(hex) = body.strip_prefix("#x") {
        return parse_codepoint(hex, 16);
    }
    if let Some(dec) = body.strip_prefix('#') {
        return parse_codepoint(dec, 10);
    }
    match body {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        _ => None,
    }
}

/// Parse a digit run into a Unicode scalar value
fn parse_codepoint(digits: &str, radix: u32) -> Option<char> {
    if digits.is_empty() {
        return None;
    }
    let value = u32::from_str_radix(digits, radix).ok()?;
    char::from_u32(value)
}
