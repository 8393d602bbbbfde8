//! Pull-style reading
//!
//! - `events`: the event types a parse produces
//! - `slice`: the reader that walks an in-memory document

pub mod events;
pub mod slice;
