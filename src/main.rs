//! Declbundle - Declaration bundle generator for modular TypeScript packages.
//!
//! This binary compiles a package's entry modules into declaration files and
//! bundles them into a single .d.ts behind a chosen public module name, with
//! proper diagnostics relay and intermediate file cleanup.

mod cli;
mod error;
mod pipeline;
mod services;

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
