//! Core parsing primitives
//!
//! The building blocks the reader is assembled from:
//! - Scanner: memchr-backed byte cursor over the input
//! - Entities: character/named reference decoding with Cow (zero-copy
//!   when possible)
//! - Attributes: tag name and attribute list extraction
//! - Scope: namespace and whitespace-policy stack

pub mod attributes;
pub mod entities;
pub mod scanner;
pub mod scope;
