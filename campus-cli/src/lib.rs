//! Library exports for campus-cli.
//!
//! Exposes the CLI structure so tooling (man pages, completions) can
//! introspect it.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
pub mod utils;

pub use cli::Cli;
