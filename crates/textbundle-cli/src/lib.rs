//! Library side of the `textbundle` command line tool.
//!
//! The binary in `main.rs` only parses arguments; the command
//! implementations and configuration loading live here so they can be
//! tested directly.

pub mod commands;
pub mod config;
pub mod logging;

pub use config::{CliConfig, DEFAULT_CONFIG_FILE};
