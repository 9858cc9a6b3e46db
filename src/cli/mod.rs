//! CLI module for ollamakit
//!
//! Handles command-line argument parsing and streamed output for the
//! `ollamakit` binary.

pub mod args;
pub mod output;

pub use args::{Args, Commands, Verbosity};
pub use output::write_token;
