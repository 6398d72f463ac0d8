//! Adjutant CLI library
//!
//! Command definitions, configuration, output formatting, and command
//! execution for the `adjutant` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, CliFormat, Command};
pub use config::{Config, OutputFormat};
pub use error::{CliError, Result};
pub use output::Formatter;
