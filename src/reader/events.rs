//! Parse event types
//!
//! Events borrow from the input wherever the content needed no
//! decoding; text and attribute values are Cow for that reason.
//! Namespace URIs are owned because they outlive the scope frames they
//! were resolved from.

use crate::core::attributes::RawAttribute;
use std::borrow::Cow;

/// A namespace-resolved name
///
/// The raw name splits at its first `:`. Unprefixed names keep an empty
/// prefix; the URI is empty for unprefixed names resolved without a
/// default namespace in scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QName<'a> {
    pub local: &'a str,
    pub prefix: &'a str,
    pub uri: String,
}

/// A resolved attribute with its decoded value
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute<'a> {
    pub name: QName<'a>,
    pub value: Cow<'a, str>,
}

/// One parsed markup construct, in document order
#[derive(Debug, Clone, PartialEq)]
pub enum Event<'a> {
    /// Start of an element; `self_closing` means no matching EndTag
    /// follows
    StartTag {
        name: QName<'a>,
        attributes: Vec<Attribute<'a>>,
        self_closing: bool,
    },
    /// End of an element
    EndTag { name: QName<'a> },
    /// Text content, entity-decoded; `whitespace_only` text appears
    /// only under an `xml:space="preserve"` scope
    Text {
        content: Cow<'a, str>,
        whitespace_only: bool,
    },
    /// CDATA section content, verbatim
    CData(&'a str),
    /// Comment content, verbatim
    Comment(&'a str),
    /// Processing instruction; attribute names stay raw (unresolved)
    ProcessingInstruction {
        target: &'a str,
        attributes: Vec<RawAttribute<'a>>,
    },
    /// DOCTYPE content, verbatim (includes the trailing `]` of an
    /// internal subset)
    Doctype(&'a str),
}

impl<'a> Event<'a> {
    /// Check if this is a start tag
    pub fn is_start_tag(&self) -> bool {
        matches!(self, Event::StartTag { .. })
    }

    /// Check if this is an end tag
    pub fn is_end_tag(&self) -> bool {
        matches!(self, Event::EndTag { .. })
    }

    /// Check if this is a text event
    pub fn is_text(&self) -> bool {
        matches!(self, Event::Text { .. })
    }

    /// The resolved name, for start and end tags
    pub fn name(&self) -> Option<&QName<'a>> {
        match self {
            Event::StartTag { name, .. } | Event::EndTag { name } => Some(name),
            _ => None,
        }
    }

    /// Character content, for text and CDATA events
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Event::Text { content, .. } => Some(content),
            Event::CData(content) => Some(content),
            _ => None,
        }
    }
}
