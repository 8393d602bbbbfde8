//! xmlscan - single-pass structural scanning of an XML subset
//!
//! Turns a complete in-memory document into a flat sequence of
//! structural events with namespace-resolved names. Two surfaces over
//! the same machinery:
//!
//! - Pull: [`SliceReader`] yields events through [`Iterator`], and
//!   [`parse_events`] collects a whole document into a `Vec`
//! - Push: [`parse_with`] drives a [`MarkupSink`] through callbacks
//!
//! Fail-fast: the first malformed construct aborts the parse with a
//! [`ParseError`] carrying a byte offset, and nothing after it is
//! reported. There is no recovery, no validation, and no DTD
//! interpretation; doctype declarations are captured verbatim, and
//! entity references other than `lt`, `gt`, `amp`, and the numeric
//! forms are errors.
//!
//! Namespace scopes, `xml:space` whitespace policy, and entity
//! decoding are handled during the single pass, so consumers see
//! resolved names and decoded text without a second traversal.

pub mod core;
pub mod error;
pub mod reader;
pub mod sax;

pub use crate::core::attributes::RawAttribute;
pub use crate::error::{ErrorKind, ParseError, Result};
pub use crate::reader::events::{Attribute, Event, QName};
pub use crate::reader::slice::{parse_events, SliceReader};
pub use crate::sax::{parse_with, MarkupSink};
