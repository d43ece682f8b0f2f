//! CLI command implementations.

pub mod algorithms;
pub mod common;
pub mod extract;
