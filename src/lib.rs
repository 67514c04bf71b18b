//! Declaration bundle generation library.
//!
//! This library compiles the entry modules of a TypeScript package into
//! declaration files and bundles them into a single .d.ts published under
//! a chosen module name:
//! - discovers entries under the package's `exports` directory
//! - drives the TypeScript compiler in declaration-only mode
//! - synthesizes an umbrella module re-exporting every entry
//! - bundles and renames the result via a Node bundler module
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod error;
pub mod pipeline;
pub mod services;

// Re-export commonly used types
pub use error::{CliError, DeclbundleError, Result};
