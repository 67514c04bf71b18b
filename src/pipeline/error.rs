//! Error types for declaration-bundle generation.
//!
//! Every stage of the pipeline reports through [`Error`]; the [`Context`] and
//! [`ErrorExt`] extension traits attach human-readable context to `Option`s
//! and filesystem results at the call site.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while generating a declaration bundle.
#[derive(Error, Debug)]
pub enum Error {
    /// The `exports` directory under the source root is missing or unreadable.
    ///
    /// This is fatal for the whole run: without the entry listing there is
    /// nothing to bundle for any output target.
    #[error("cannot read entry directory {}: {source}", path.display())]
    EntryDirUnreadable {
        /// The `exports` directory that could not be listed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// `tsconfig.json` could not be read or parsed.
    #[error("cannot load project config {}: {reason}", path.display())]
    ProjectConfig {
        /// Path to the offending tsconfig.json
        path: PathBuf,
        /// Read or parse failure description
        reason: String,
    },

    /// The resolved unbundled output path does not carry the `.js` extension
    /// the declaration emitter derives its artifact names from.
    #[error("unexpected output extension {extension:?} for {}", path.display())]
    UnexpectedOutputExtension {
        /// The computed unbundled output path
        path: PathBuf,
        /// The extension it actually carries
        extension: String,
    },

    /// The compiler ran but did not leave a declaration file behind.
    #[error("compiler produced no declaration file at {}", path.display())]
    CompileFailed {
        /// Expected location of the declaration artifact
        path: PathBuf,
    },

    /// The declaration-bundling service failed.
    #[error("declaration bundling failed: {0}")]
    Bundling(String),

    /// An external tool could not be located on PATH.
    #[error("{tool} not found on PATH: {source}")]
    ToolNotFound {
        /// Tool binary name (e.g. `tsc`, `node`)
        tool: String,
        /// Lookup failure from `which`
        #[source]
        source: which::Error,
    },

    /// An external command could not be executed.
    #[error("failed to run {command}: {error}")]
    CommandFailed {
        /// Command that failed to start
        command: String,
        /// Underlying I/O error
        #[source]
        error: std::io::Error,
    },

    /// Filesystem operation failure with the operation and path that failed.
    #[error("{operation} failed for {}: {source}", path.display())]
    Fs {
        /// Operation description (e.g. "copying ambient type file")
        operation: String,
        /// Path the operation was applied to
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON errors crossing the bundler IPC boundary
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors
    #[error("{0}")]
    GenericError(String),
}

/// Adds message context to `Option` and `Result` values.
pub trait Context<T> {
    /// Converts the value into a pipeline result, using `msg` on failure.
    fn context(self, msg: &str) -> Result<T>;

    /// Like [`Context::context`], but the message is built lazily.
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(msg.to_string()))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(f()))
    }
}

impl<T, E: std::fmt::Display> Context<T> for std::result::Result<T, E> {
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{msg}: {e}")))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{}: {e}", f())))
    }
}

/// Attaches the failed operation and path to filesystem errors.
pub trait ErrorExt<T> {
    /// Wraps an `std::io::Error` with the operation name and the path it
    /// was applied to.
    fn fs_context(self, operation: &str, path: &Path) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, operation: &str, path: &Path) -> Result<T> {
        self.map_err(|source| Error::Fs {
            operation: operation.to_string(),
            path: path.to_path_buf(),
            source,
        })
    }
}
