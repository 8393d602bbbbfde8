//! Pull reader over an in-memory document
//!
//! The top-level state machine. Walks the input left to right,
//! classifies each construct by the characters after `<`, and yields
//! events. Elements push a scope frame before their own name is
//! resolved, so a tag's namespace declarations apply to itself.
//!
//! One-shot and fail-fast: the whole document must be in memory, and
//! the first malformed construct ends the parse for good.

use super::events::{Attribute, Event, QName};
use crate::core::attributes::{scan_tag, TagContent};
use crate::core::entities::decode_text;
use crate::core::scanner::Scanner;
use crate::core::scope::ScopeStack;
use crate::error::{ErrorKind, ParseError, Result};

/// Event reader over a complete document
pub struct SliceReader<'a> {
    input: &'a str,
    scanner: Scanner<'a>,
    scopes: ScopeStack,
    failed: bool,
}

impl<'a> SliceReader<'a> {
    /// Create a reader over the whole document
    pub fn new(input: &'a str) -> Self {
        SliceReader {
            input,
            scanner: Scanner::new(input),
            scopes: ScopeStack::new(),
            failed: false,
        }
    }

    /// Number of currently open elements
    pub fn depth(&self) -> usize {
        self.scopes.depth()
    }

    /// Get the next event
    ///
    /// Returns None at end of input, and forever after the first error.
    /// Whitespace-only text outside `xml:space="preserve"` scopes is
    /// consumed without producing an event.
    pub fn next_event(&mut self) -> Option<Result<Event<'a>>> {
        if self.failed {
            return None;
        }
        loop {
            if self.scanner.is_eof() {
                return None;
            }
            let result = if self.scanner.peek() == Some(b'<') {
                self.scan_markup()
            } else {
                self.scan_text()
            };
            match result {
                Ok(Some(event)) => return Some(Ok(event)),
                Ok(None) => continue,
                Err(err) => {
                    self.failed = true;
                    return Some(Err(err));
                }
            }
        }
    }

    /// Dispatch on the character after '<'
    fn scan_markup(&mut self) -> Result<Option<Event<'a>>> {
        let open = self.scanner.position();
        match self.scanner.peek_at(1) {
            Some(b'/') => self.scan_end_tag(open).map(Some),
            Some(b'?') => self.scan_pi(open).map(Some),
            Some(b'!') => self.scan_declaration(open).map(Some),
            _ => self.scan_start_tag(open).map(Some),
        }
    }

    fn scan_start_tag(&mut self, open: usize) -> Result<Event<'a>> {
        let TagContent {
            name,
            attributes: raw_attrs,
            consumed,
        } = scan_tag(self.input, open + 1)?;
        self.scanner.set_position(open + 1 + consumed);

        let self_closing = if self.scanner.starts_with("/>") {
            true
        } else if self.scanner.starts_with(">") {
            false
        } else {
            return Err(ParseError::new(
                ErrorKind::UnexpectedEndOfInput("start tag"),
                open,
            ));
        };

        // The frame goes on first so the tag's own declarations are in
        // scope for its own name and attributes
        self.scopes.push_frame(&raw_attrs, open)?;

        let mut attributes = Vec::with_capacity(raw_attrs.len());
        for attr in raw_attrs {
            let name = self.resolve_name(attr.name, false, open)?;
            attributes.push(Attribute {
                name,
                value: attr.value,
            });
        }
        let name = self.resolve_name(name, true, open)?;

        self.scanner.advance(if self_closing { 2 } else { 1 });
        let event = Event::StartTag {
            name,
            attributes,
            self_closing,
        };
        if self_closing {
            // No children will be scanned under this frame
            self.scopes.pop_frame();
        }
        Ok(event)
    }

    fn scan_end_tag(&mut self, open: usize) -> Result<Event<'a>> {
        self.scanner.set_position(open + 2);
        let gt = self.scanner.find_byte(b'>').ok_or_else(|| {
            ParseError::new(ErrorKind::UnexpectedEndOfInput("end tag"), open)
        })?;
        // The raw name is everything up to '>', untrimmed; no check
        // that it matches the open element
        let raw = self.scanner.slice(open + 2, gt);
        let name = self.resolve_name(raw, true, open)?;
        self.scanner.set_position(gt + 1);
        self.scopes.pop_frame();
        Ok(Event::EndTag { name })
    }

    fn scan_pi(&mut self, open: usize) -> Result<Event<'a>> {
        let TagContent {
            name,
            attributes,
            consumed,
        } = scan_tag(self.input, open + 2)?;
        self.scanner.set_position(open + 2 + consumed);
        if !self.scanner.starts_with("?>") {
            return Err(ParseError::new(
                ErrorKind::UnexpectedEndOfInput("processing instruction"),
                open,
            ));
        }
        self.scanner.advance(2);
        Ok(Event::ProcessingInstruction {
            target: name,
            attributes,
        })
    }

    /// `<!` constructs: comment, CDATA section, or doctype
    fn scan_declaration(&mut self, open: usize) -> Result<Event<'a>> {
        if self.scanner.starts_with("<!--") {
            self.scanner.set_position(open + 4);
            let end = self.scanner.find_str("-->").ok_or_else(|| {
                ParseError::new(ErrorKind::UnexpectedEndOfInput("comment"), open)
            })?;
            let content = self.scanner.slice(open + 4, end);
            self.scanner.set_position(end + 3);
            Ok(Event::Comment(content))
        } else if self.scanner.starts_with("<![CDATA[") {
            self.scanner.set_position(open + 9);
            let end = self.scanner.find_str("]]>").ok_or_else(|| {
                ParseError::new(ErrorKind::UnexpectedEndOfInput("CDATA section"), open)
            })?;
            let content = self.scanner.slice(open + 9, end);
            self.scanner.set_position(end + 3);
            Ok(Event::CData(content))
        } else if self.scanner.starts_with("<!DOCTYPE") {
            self.scan_doctype(open)
        } else {
            Err(ParseError::new(ErrorKind::UnknownMarkupConstruct, open))
        }
    }

    fn scan_doctype(&mut self, open: usize) -> Result<Event<'a>> {
        let base = open + 9;
        self.scanner.set_position(base);
        let gt = self.scanner.find_byte(b'>').ok_or_else(|| {
            ParseError::new(ErrorKind::UnexpectedEndOfInput("doctype"), open)
        })?;
        // A '[' before the first '>' means an internal subset: the
        // declaration then runs to "]>" and keeps the ']' in its content
        let complex = self.scanner.find_byte(b'[').is_some_and(|b| b < gt);
        if complex {
            let close = self.scanner.find_str("]>").ok_or_else(|| {
                ParseError::new(ErrorKind::UnexpectedEndOfInput("doctype"), open)
            })?;
            let content = self.scanner.slice(base, close + 1);
            self.scanner.set_position(close + 2);
            Ok(Event::Doctype(content))
        } else {
            let content = self.scanner.slice(base, gt);
            self.scanner.set_position(gt + 1);
            Ok(Event::Doctype(content))
        }
    }

    /// Text runs to the next '<' or end of input
    ///
    /// Whitespace-only runs are classified on the raw text and dropped
    /// (undecoded) unless some scope preserves whitespace.
    fn scan_text(&mut self) -> Result<Option<Event<'a>>> {
        let start = self.scanner.position();
        let end = self.scanner.find_byte(b'<').unwrap_or(self.input.len());
        let raw = self.scanner.slice(start, end);
        self.scanner.set_position(end);

        let whitespace_only = raw.trim().is_empty();
        if whitespace_only && !self.scopes.is_whitespace_preserved() {
            return Ok(None);
        }
        let content = decode_text(raw, start)?;
        Ok(Some(Event::Text {
            content,
            whitespace_only,
        }))
    }

    /// Split a raw name at its first ':' and resolve the namespace
    ///
    /// Unprefixed names pick up the default namespace only when
    /// `use_default` is set: element names do, attribute names do not.
    fn resolve_name(&self, raw: &'a str, use_default: bool, at: usize) -> Result<QName<'a>> {
        match raw.split_once(':') {
            Some((prefix, local)) => Ok(QName {
                local,
                prefix,
                uri: self.scopes.lookup_prefix(prefix, at)?.to_string(),
            }),
            None if use_default => Ok(QName {
                local: raw,
                prefix: "",
                uri: self.scopes.lookup_default().to_string(),
            }),
            None => Ok(QName {
                local: raw,
                prefix: "",
                uri: String::new(),
            }),
        }
    }
}

impl<'a> Iterator for SliceReader<'a> {
    type Item = Result<Event<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event()
    }
}

/// Parse a whole document into its event sequence
///
/// Stops at the first error; events before it are discarded.
pub fn parse_events(input: &str) -> Result<Vec<Event<'_>>> {
    SliceReader::new(input).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scope::ns;
    use std::borrow::Cow;

    fn events(input: &str) -> Vec<Event<'_>> {
        parse_events(input).unwrap()
    }

    fn first_error(input: &str) -> ParseError {
        parse_events(input).unwrap_err()
    }

    #[test]
    fn test_empty_input() {
        assert!(events("").is_empty());
    }

    #[test]
    fn test_self_closing_element() {
        let evs = events("<a/>");
        assert_eq!(evs.len(), 1);
        match &evs[0] {
            Event::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                assert_eq!(name.local, "a");
                assert_eq!(name.prefix, "");
                assert_eq!(name.uri, "");
                assert!(attributes.is_empty());
                assert!(self_closing);
            }
            other => panic!("expected StartTag, got {other:?}"),
        }
    }

    #[test]
    fn test_attributes_and_comment() {
        let evs = events("<a b='1' c=\"2\"><!--x--></a>");
        assert_eq!(evs.len(), 3);
        match &evs[0] {
            Event::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                assert_eq!(name.local, "a");
                assert!(!self_closing);
                assert_eq!(attributes.len(), 2);
                assert_eq!(attributes[0].name.local, "b");
                assert_eq!(attributes[0].value, "1");
                assert_eq!(attributes[1].name.local, "c");
                assert_eq!(attributes[1].value, "2");
            }
            other => panic!("expected StartTag, got {other:?}"),
        }
        assert_eq!(evs[1], Event::Comment("x"));
        assert_eq!(evs[2].name().map(|n| n.local), Some("a"));
        assert!(evs[2].is_end_tag());
    }

    #[test]
    fn test_prefix_resolution() {
        let evs = events("<a xmlns:p='urn:p'><p:b/></a>");
        match &evs[1] {
            Event::StartTag { name, .. } => {
                assert_eq!(name.local, "b");
                assert_eq!(name.prefix, "p");
                assert_eq!(name.uri, "urn:p");
            }
            other => panic!("expected StartTag, got {other:?}"),
        }
    }

    #[test]
    fn test_default_namespace_on_elements_not_attributes() {
        let evs = events("<a xmlns='urn:d' k='v'><b/></a>");
        match &evs[0] {
            Event::StartTag { name, attributes, .. } => {
                assert_eq!(name.uri, "urn:d");
                // bare xmlns is itself an unprefixed attribute
                assert_eq!(attributes[0].name.local, "xmlns");
                assert_eq!(attributes[0].name.uri, "");
                assert_eq!(attributes[1].name.local, "k");
                assert_eq!(attributes[1].name.uri, "");
            }
            other => panic!("expected StartTag, got {other:?}"),
        }
        assert_eq!(evs[1].name().map(|n| n.uri.as_str()), Some("urn:d"));
        // the end tag resolves against the still-open scope
        assert_eq!(evs[2].name().map(|n| n.uri.as_str()), Some("urn:d"));
    }

    #[test]
    fn test_namespace_declarations_appear_as_attributes() {
        let evs = events("<a xmlns:p='urn:p'/>");
        match &evs[0] {
            Event::StartTag { attributes, .. } => {
                assert_eq!(attributes.len(), 1);
                assert_eq!(attributes[0].name.prefix, "xmlns");
                assert_eq!(attributes[0].name.local, "p");
                assert_eq!(attributes[0].name.uri, ns::XMLNS);
                assert_eq!(attributes[0].value, "urn:p");
            }
            other => panic!("expected StartTag, got {other:?}"),
        }
    }

    #[test]
    fn test_xml_prefixed_attribute_resolves() {
        let evs = events("<a xml:space='preserve'/>");
        match &evs[0] {
            Event::StartTag { attributes, .. } => {
                assert_eq!(attributes[0].name.prefix, "xml");
                assert_eq!(attributes[0].name.uri, ns::XML);
            }
            other => panic!("expected StartTag, got {other:?}"),
        }
    }

    #[test]
    fn test_self_closing_scope_is_popped() {
        // the binding on the self-closed element must not leak to its sibling
        let err = first_error("<r><a xmlns:p='urn:p'/><p:b/></r>");
        assert_eq!(
            err.kind,
            ErrorKind::UnresolvedNamespacePrefix("p".to_string())
        );
    }

    #[test]
    fn test_sibling_sees_parent_bindings() {
        let evs = events("<r xmlns:p='urn:p'><a/><p:b/></r>");
        match &evs[2] {
            Event::StartTag { name, .. } => assert_eq!(name.uri, "urn:p"),
            other => panic!("expected StartTag, got {other:?}"),
        }
    }

    #[test]
    fn test_text_entity_decoding() {
        let evs = events("<a>&lt;&amp;&gt;</a>");
        assert_eq!(evs[1].as_text(), Some("<&>"));
    }

    #[test]
    fn test_text_borrowed_when_clean() {
        let evs = events("<a>plain</a>");
        match &evs[1] {
            Event::Text { content, .. } => assert!(matches!(content, Cow::Borrowed(_))),
            other => panic!("expected Text, got {other:?}"),
        }
    }

    #[test]
    fn test_whitespace_only_text_suppressed() {
        let evs = events("<a>  \n  <b/>\t</a>");
        assert_eq!(evs.len(), 3);
        assert!(evs.iter().all(|e| !e.is_text()));
    }

    #[test]
    fn test_whitespace_preserved_scope() {
        let evs = events("<a xml:space='preserve'><b> </b></a>");
        let texts: Vec<_> = evs.iter().filter(|e| e.is_text()).collect();
        assert_eq!(texts.len(), 1);
        match texts[0] {
            Event::Text {
                content,
                whitespace_only,
            } => {
                assert_eq!(content, " ");
                assert!(whitespace_only);
            }
            other => panic!("expected Text, got {other:?}"),
        }
    }

    #[test]
    fn test_mixed_text_keeps_surrounding_whitespace() {
        let evs = events("<a> x </a>");
        match &evs[1] {
            Event::Text {
                content,
                whitespace_only,
            } => {
                assert_eq!(content, " x ");
                assert!(!whitespace_only);
            }
            other => panic!("expected Text, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_space_attribute_last_wins() {
        // the later xml:space in the same tag overrides the earlier one
        let evs = events("<a xml:space='preserve' xml:space='default'> <b/></a>");
        assert!(evs.iter().all(|e| !e.is_text()));

        let evs = events("<a xml:space='default' xml:space='preserve'> <b/></a>");
        assert!(evs.iter().any(|e| e.is_text()));
    }

    #[test]
    fn test_encoded_whitespace_not_suppressed() {
        // whitespace-only is judged on the raw run; "&#32;" is not
        // itself whitespace even though it decodes to a space
        let evs = events("<a>&#32;</a>");
        assert_eq!(evs.len(), 3);
        match &evs[1] {
            Event::Text {
                content,
                whitespace_only,
            } => {
                assert_eq!(content, " ");
                assert!(!whitespace_only);
            }
            other => panic!("expected Text, got {other:?}"),
        }
    }

    #[test]
    fn test_cdata_raw() {
        let evs = events("<a><![CDATA[x &amp; <y>]]></a>");
        assert_eq!(evs[1], Event::CData("x &amp; <y>"));
    }

    #[test]
    fn test_comment_raw() {
        let evs = events("<a><!--x &amp; y--></a>");
        assert_eq!(evs[1], Event::Comment("x &amp; y"));
    }

    #[test]
    fn test_processing_instruction() {
        let evs = events("<?xml version=\"1.0\"?><a/>");
        match &evs[0] {
            Event::ProcessingInstruction { target, attributes } => {
                assert_eq!(*target, "xml");
                assert_eq!(attributes.len(), 1);
                assert_eq!(attributes[0].name, "version");
                assert_eq!(attributes[0].value, "1.0");
            }
            other => panic!("expected ProcessingInstruction, got {other:?}"),
        }
    }

    #[test]
    fn test_simple_doctype() {
        let evs = events("<!DOCTYPE html><a/>");
        assert_eq!(evs[0], Event::Doctype(" html"));
        assert!(evs[1].is_start_tag());
    }

    #[test]
    fn test_complex_doctype_keeps_bracket() {
        let evs = events("<!DOCTYPE foo [ <!ENTITY x \"y\"> ]><a/>");
        assert_eq!(evs[0], Event::Doctype(" foo [ <!ENTITY x \"y\"> ]"));
        assert!(evs[1].is_start_tag());
    }

    #[test]
    fn test_doctype_defines_no_entities() {
        // the internal subset is captured, never interpreted
        let err = first_error("<!DOCTYPE foo [ <!ENTITY x \"y\"> ]><a>&x;</a>");
        assert_eq!(err.kind, ErrorKind::UnknownEntity("x".to_string()));
    }

    #[test]
    fn test_unterminated_start_tag() {
        let err = first_error("<a");
        assert_eq!(err.kind, ErrorKind::UnexpectedEndOfInput("start tag"));
        assert_eq!(err.offset, 0);
    }

    #[test]
    fn test_slash_must_touch_bracket() {
        // "/ >" is not a self-closing terminator
        let err = first_error("<a / >");
        assert_eq!(err.kind, ErrorKind::UnexpectedEndOfInput("start tag"));
    }

    #[test]
    fn test_unterminated_constructs() {
        assert_eq!(
            first_error("<a><!--x").kind,
            ErrorKind::UnexpectedEndOfInput("comment")
        );
        assert_eq!(
            first_error("<a><![CDATA[x").kind,
            ErrorKind::UnexpectedEndOfInput("CDATA section")
        );
        assert_eq!(
            first_error("<!DOCTYPE foo").kind,
            ErrorKind::UnexpectedEndOfInput("doctype")
        );
        assert_eq!(
            first_error("</a").kind,
            ErrorKind::UnexpectedEndOfInput("end tag")
        );
        assert_eq!(
            first_error("<?pi a='1'").kind,
            ErrorKind::UnexpectedEndOfInput("processing instruction")
        );
    }

    #[test]
    fn test_unknown_markup_construct() {
        let err = first_error("<!-");
        assert_eq!(err.kind, ErrorKind::UnknownMarkupConstruct);
        assert_eq!(err.offset, 0);
        assert_eq!(
            first_error("<a><!foo></a>").kind,
            ErrorKind::UnknownMarkupConstruct
        );
    }

    #[test]
    fn test_invalid_reserved_attribute() {
        let err = first_error("<a xmlCustom='1'/>");
        assert_eq!(
            err.kind,
            ErrorKind::InvalidReservedAttribute("xmlCustom".to_string())
        );
        assert_eq!(err.offset, 0);
    }

    #[test]
    fn test_unbound_prefix() {
        let err = first_error("<p:a/>");
        assert_eq!(
            err.kind,
            ErrorKind::UnresolvedNamespacePrefix("p".to_string())
        );
    }

    #[test]
    fn test_mismatched_end_tag_accepted() {
        let evs = events("<a></b>");
        assert_eq!(evs[1].name().map(|n| n.local), Some("b"));
    }

    #[test]
    fn test_stray_end_tag_keeps_root_scope() {
        // the root frame survives the underflowing pop
        let evs = events("</a><b xml:space='x'/>");
        assert_eq!(evs.len(), 2);
        assert!(evs[0].is_end_tag());
        assert!(evs[1].is_start_tag());
    }

    #[test]
    fn test_end_tag_name_is_raw() {
        let evs = events("<a></a >");
        assert_eq!(evs[1].name().map(|n| n.local), Some("a "));
    }

    #[test]
    fn test_empty_tag_name_quirk() {
        let evs = events("<>x</>");
        assert_eq!(evs[0].name().map(|n| n.local), Some(""));
        assert_eq!(evs[1].as_text(), Some("x"));
        assert_eq!(evs[2].name().map(|n| n.local), Some(""));
    }

    #[test]
    fn test_depth_tracks_nesting() {
        let mut reader = SliceReader::new("<a><b/><c></c></a>");
        assert_eq!(reader.depth(), 0);
        reader.next_event().unwrap().unwrap(); // <a>
        assert_eq!(reader.depth(), 1);
        reader.next_event().unwrap().unwrap(); // <b/>
        assert_eq!(reader.depth(), 1);
        reader.next_event().unwrap().unwrap(); // <c>
        assert_eq!(reader.depth(), 2);
        reader.next_event().unwrap().unwrap(); // </c>
        assert_eq!(reader.depth(), 1);
        reader.next_event().unwrap().unwrap(); // </a>
        assert_eq!(reader.depth(), 0);
        assert!(reader.next_event().is_none());
    }

    #[test]
    fn test_reader_fuses_after_error() {
        let mut reader = SliceReader::new("<a>&bad;</a>");
        assert!(matches!(reader.next_event(), Some(Ok(_))));
        assert!(matches!(reader.next_event(), Some(Err(_))));
        assert!(reader.next_event().is_none());
        assert!(reader.next_event().is_none());
    }

    #[test]
    fn test_events_before_error_are_yielded() {
        let mut reader = SliceReader::new("<a><b/><c");
        let mut seen = 0;
        let mut failed = false;
        for event in &mut reader {
            match event {
                Ok(_) => seen += 1,
                Err(_) => {
                    failed = true;
                    break;
                }
            }
        }
        assert_eq!(seen, 2);
        assert!(failed);
    }

    #[test]
    fn test_idempotent_reparse() {
        let input = "<?p k='v'?><!DOCTYPE d><a xmlns:n='u'>t<n:b/><!--c--></a>";
        assert_eq!(events(input), events(input));
    }

    #[test]
    fn test_document_order() {
        let evs = events("<a><b>t</b><c/></a>");
        let kinds: Vec<_> = evs
            .iter()
            .map(|e| match e {
                Event::StartTag { name, self_closing, .. } => {
                    if *self_closing {
                        format!("empty:{}", name.local)
                    } else {
                        format!("start:{}", name.local)
                    }
                }
                Event::EndTag { name } => format!("end:{}", name.local),
                Event::Text { content, .. } => format!("text:{content}"),
                other => format!("{other:?}"),
            })
            .collect();
        assert_eq!(
            kinds,
            ["start:a", "start:b", "text:t", "end:b", "empty:c", "end:a"]
        );
    }
}
