//! LineageMap CLI library.
//!
//! This module exposes internal types for testing purposes.
//! The main entry point is the `lineagemap` binary.

pub mod cli;
pub mod input;
pub mod output;
#[cfg(feature = "serve")]
pub mod server;

// Re-export commonly used types
pub use cli::Args;
