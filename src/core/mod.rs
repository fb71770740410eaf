// Public modules
pub mod asset;
pub mod config;
pub mod error;
pub mod invoke;
pub mod project;
pub mod tree;
pub mod verify;

pub mod paths;

#[cfg(test)]
pub(crate) mod testing;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
