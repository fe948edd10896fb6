//! Subcommand implementations.
//!
//! Each command drives the same page orchestration the web storefront
//! uses and returns the notices it raised; `main` prints them and picks the
//! exit code.

pub mod cart;
pub mod catalog;
pub mod order;

use std::io;

use shopfront_storefront::config::ConfigError;
use thiserror::Error;

/// Errors that stop a command before it can report through notices.
#[derive(Debug, Error)]
pub enum CliError {
    /// The API configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Writing to the terminal failed.
    #[error("Output error: {0}")]
    Io(#[from] io::Error),
}
