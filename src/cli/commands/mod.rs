//! Command implementations.

pub mod completions;
pub mod push;
pub mod version;
