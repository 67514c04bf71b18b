//! Command line interface for the declaration bundle generator.
//!
//! Parses the invocation, assembles the generation options, wires up the
//! external tools and reports the run outcome as an exit code.

mod args;

pub use args::Args;

use crate::error::{CliError, Result};
use crate::pipeline::Generator;
use crate::services::{NodeBundler, TscCompiler};

/// Main CLI entry point
///
/// Returns the process exit code: `0` when every requested target produced
/// its bundle, `1` otherwise.
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;
    let options = args.load_options().await?;

    let compiler = match &args.tsc {
        Some(path) => TscCompiler::at(path),
        None => TscCompiler::locate()?,
    };
    let bundler = match &args.node {
        Some(path) => NodeBundler::at(path, args.bundler_module.as_str()),
        None => NodeBundler::locate(args.bundler_module.as_str())?,
    }
    .with_working_dir(&options.root_dir);

    let generator = Generator::new(compiler, bundler);
    let summary = generator.generate(&options).await?;

    for report in &summary.targets {
        if let Ok(files) = &report.outcome {
            log::debug!(
                "Generated '{}' in {} ({} file(s))",
                report.root_module_name,
                report.out_dir.display(),
                files.len()
            );
        }
    }

    if summary.all_succeeded() {
        Ok(0)
    } else {
        log::error!(
            "{} of {} target(s) failed",
            summary.failed_count(),
            summary.targets.len()
        );
        Ok(1)
    }
}
