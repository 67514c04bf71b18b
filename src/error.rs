//! Top-level error types.
//!
//! The CLI reports through [`DeclbundleError`], which wraps argument
//! handling failures and everything the pipeline can raise.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, DeclbundleError>;

/// Main error type for the declaration bundle generator
#[derive(Error, Debug)]
pub enum DeclbundleError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Pipeline errors
    #[error("{0}")]
    Pipeline(#[from] crate::pipeline::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Missing required argument
    #[error("Missing required argument: {argument}")]
    MissingArgument {
        /// Argument name
        argument: String,
    },

    /// Configuration file could not be used
    #[error("Cannot use config file {}: {reason}", path.display())]
    ConfigFile {
        /// Path to the configuration file
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },
}
