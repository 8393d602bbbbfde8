//! Cursor-driven scanning using memchr
//!
//! Byte-level cursor over the input document. Single-byte searches go
//! through memchr (SIMD when available); multi-byte terminators anchor
//! on their first byte and verify the rest.
//!
//! Every delimiter this crate searches for is ASCII, so byte positions
//! produced here always sit on UTF-8 character boundaries and slicing
//! back to `&str` is safe.

use memchr::memchr;

/// ASCII whitespace as recognized between tokens (space, tab, LF, CR)
#[inline]
pub(crate) fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

/// Byte cursor over the input document
pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given input
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Scanner { input, pos: 0 }
    }

    /// Get the current position
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Set the current position
    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Check if we've reached the end
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Peek at the current byte without advancing
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    /// Peek at the byte at an offset from the current position
    #[inline]
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.as_bytes().get(self.pos + offset).copied()
    }

    /// Advance by n bytes
    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    /// Skip whitespace characters (space, tab, newline, carriage return)
    #[inline]
    pub fn skip_whitespace(&mut self) {
        let bytes = self.input.as_bytes();
        while self.pos < bytes.len() && is_space(bytes[self.pos]) {
            self.pos += 1;
        }
    }

    /// Absolute position of the next occurrence of `byte`, at or after
    /// the cursor
    #[inline]
    pub fn find_byte(&self, byte: u8) -> Option<usize> {
        memchr(byte, &self.input.as_bytes()[self.pos..]).map(|i| self.pos + i)
    }

    /// Absolute position of the next occurrence of `needle`, at or after
    /// the cursor
    ///
    /// Anchors on the first byte with memchr, then verifies the rest.
    pub fn find_str(&self, needle: &str) -> Option<usize> {
        let bytes = self.input.as_bytes();
        let needle = needle.as_bytes();
        let first = *needle.first()?;
        let mut from = self.pos;
        while let Some(pos) = memchr(first, &bytes[from..]).map(|i| from + i) {
            if bytes[pos..].starts_with(needle) {
                return Some(pos);
            }
            from = pos + 1;
        }
        None
    }

    /// Check if the input starts with `needle` at the current position
    #[inline]
    pub fn starts_with(&self, needle: &str) -> bool {
        self.input.as_bytes()[self.pos..].starts_with(needle.as_bytes())
    }

    /// Borrow `start..end` from the input
    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.input[start..end]
    }
}
