//! Namespace and whitespace-policy scopes
//!
//! One frame per open element, over a pre-seeded root frame. Frames
//! inherit nothing; prefix and default-namespace lookups walk the stack
//! innermost to outermost. The stack is never empty.

use super::attributes::RawAttribute;
use crate::error::{ErrorKind, ParseError, Result};

/// Well-known namespace URIs
pub mod ns {
    pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
    pub const XMLNS: &str = "http://www.w3.org/2000/xmlns/";
}

/// Whitespace handling declared via `xml:space`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpacePolicy {
    Default,
    Preserve,
}

/// Bindings and policy for one open element
#[derive(Debug, Clone)]
struct ScopeFrame {
    policy: SpacePolicy,
    default_ns: Option<String>,
    /// Prefix -> URI, in declaration order; later declarations shadow
    bindings: Vec<(String, String)>,
}

/// Stack of scope frames
#[derive(Debug)]
pub struct ScopeStack {
    frames: Vec<ScopeFrame>,
}

impl ScopeStack {
    /// Create a stack holding the root frame: `xml` and `xmlns`
    /// pre-bound, empty default namespace, default whitespace policy
    pub fn new() -> Self {
        ScopeStack {
            frames: vec![ScopeFrame {
                policy: SpacePolicy::Default,
                default_ns: Some(String::new()),
                bindings: vec![
                    ("xml".to_string(), ns::XML.to_string()),
                    ("xmlns".to_string(), ns::XMLNS.to_string()),
                ],
            }],
        }
    }

    /// Derive a frame from a start tag's raw attributes and push it
    ///
    /// `xmlns:p` adds a prefix binding, bare `xmlns` sets the default
    /// namespace, `xml:space` assigns the whitespace policy on each
    /// occurrence (so the last one in the tag wins); all values are
    /// trimmed. Other `xml:*` attributes are accepted and ignored, but
    /// any other name starting with `xml` is rejected.
    /// Errors report `at`, the offset of the owning tag.
    pub fn push_frame(&mut self, attributes: &[RawAttribute<'_>], at: usize) -> Result<()> {
        let mut frame = ScopeFrame {
            policy: SpacePolicy::Default,
            default_ns: None,
            bindings: Vec::new(),
        };
        for attr in attributes {
            if let Some(prefix) = attr.name.strip_prefix("xmlns:") {
                frame
                    .bindings
                    .push((prefix.to_string(), attr.value.trim().to_string()));
            } else if attr.name == "xmlns" {
                frame.default_ns = Some(attr.value.trim().to_string());
            } else if let Some(key) = attr.name.strip_prefix("xml:") {
                if key == "space" {
                    frame.policy = if attr.value.trim() == "preserve" {
                        SpacePolicy::Preserve
                    } else {
                        SpacePolicy::Default
                    };
                }
            } else if attr.name.starts_with("xml") {
                return Err(ParseError::new(
                    ErrorKind::InvalidReservedAttribute(attr.name.to_string()),
                    at,
                ));
            }
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Remove the innermost frame
    ///
    /// The root frame stays: popping at depth zero only happens on
    /// malformed input (a stray end tag) and is a no-op.
    pub fn pop_frame(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Resolve a prefix to its URI, innermost frame first
    pub fn lookup_prefix(&self, prefix: &str, at: usize) -> Result<&str> {
        for frame in self.frames.iter().rev() {
            for (p, uri) in frame.bindings.iter().rev() {
                if p == prefix {
                    return Ok(uri);
                }
            }
        }
        Err(ParseError::new(
            ErrorKind::UnresolvedNamespacePrefix(prefix.to_string()),
            at,
        ))
    }

    /// The innermost explicitly-set default namespace, or ""
    pub fn lookup_default(&self) -> &str {
        self.frames
            .iter()
            .rev()
            .find_map(|f| f.default_ns.as_deref())
            .unwrap_or("")
    }

    /// True if any enclosing scope declared `xml:space="preserve"`
    pub fn is_whitespace_preserved(&self) -> bool {
        self.frames.iter().any(|f| f.policy == SpacePolicy::Preserve)
    }

    /// Number of frames above the root
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}
