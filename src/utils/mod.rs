//! Generic utility primitives with zero domain knowledge.
//!
//! - `shell` - Quoting for command lines shown in error messages

pub mod shell;
