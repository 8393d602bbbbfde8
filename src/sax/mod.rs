//! Push-style parsing
//!
//! A [`MarkupSink`] receives a callback for each construct as the
//! document is walked. This is a thin layer over the pull reader: the
//! driver pulls events and forwards them in document order, stopping
//! at the first error.

use crate::core::attributes::RawAttribute;
use crate::error::Result;
use crate::reader::events::{Attribute, Event, QName};
use crate::reader::slice::SliceReader;

/// Callback interface for push-style parsing
///
/// Implement this trait to receive parsing events. Element and
/// attribute names arrive already resolved against the namespace
/// scopes in force at that point in the document.
pub trait MarkupSink {
    /// Called when an element opens
    ///
    /// # Arguments
    /// * `name` - Resolved element name
    /// * `attributes` - Resolved attributes in document order
    /// * `self_closing` - True for `<name/>`; no `end_element` call
    ///   will follow
    fn start_element(
        &mut self,
        name: &QName<'_>,
        attributes: &[Attribute<'_>],
        self_closing: bool,
    );

    /// Called when an element closes
    ///
    /// The name is resolved before the element's scope frame is
    /// dropped, and is not checked against the open element.
    fn end_element(&mut self, name: &QName<'_>);

    /// Called for text content
    ///
    /// # Arguments
    /// * `content` - Text with entity references already decoded
    /// * `whitespace_only` - True when the raw run was all whitespace;
    ///   such runs are reported only under `xml:space="preserve"`
    fn text(&mut self, content: &str, whitespace_only: bool);

    /// Called for CDATA sections, content verbatim
    fn cdata(&mut self, content: &str);

    /// Called for comments, content verbatim
    fn comment(&mut self, content: &str);

    /// Called for processing instructions
    ///
    /// # Arguments
    /// * `target` - PI target as written, not namespace-resolved
    /// * `attributes` - Pseudo-attributes with raw names
    fn processing_instruction(&mut self, target: &str, attributes: &[RawAttribute<'_>]);

    /// Called for DOCTYPE declarations (optional, default does nothing)
    fn doctype(&mut self, _content: &str) {}
}

/// Parse a document, forwarding every event to `sink`
///
/// Fail-fast: callbacks already delivered stay delivered when a later
/// construct fails, the error is returned, and nothing further is
/// reported.
pub fn parse_with<S: MarkupSink>(input: &str, sink: &mut S) -> Result<()> {
    for event in SliceReader::new(input) {
        match event? {
            Event::StartTag {
                name,
                attributes,
                self_closing,
            } => sink.start_element(&name, &attributes, self_closing),
            Event::EndTag { name } => sink.end_element(&name),
            Event::Text {
                content,
                whitespace_only,
            } => sink.text(&content, whitespace_only),
            Event::CData(content) => sink.cdata(content),
            Event::Comment(content) => sink.comment(content),
            Event::ProcessingInstruction { target, attributes } => {
                sink.processing_instruction(target, &attributes)
            }
            Event::Doctype(content) => sink.doctype(content),
        }
    }
    Ok(())
}
