//! CLI command implementations.

pub mod common;
pub mod optimize;
pub mod rules;
pub mod version;
