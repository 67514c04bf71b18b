//! Pipeline orchestration.
//!
//! [`Generator`] runs the whole sequence once per output target, strictly
//! one target at a time: targets share fixed intermediate file names, so a
//! later target must not start before the earlier target's cleanup
//! finished. A failed target is reported and the run moves on to the next
//! one; only an unreadable entry directory aborts the run as a whole, since
//! no target can succeed without the entry listing.

use std::path::{Path, PathBuf};
use tokio::fs;

use crate::pipeline::bundle::bundle_declarations;
use crate::pipeline::cleanup::CleanupSet;
use crate::pipeline::discovery::{discover_entries, EntryMap, ENTRY_DIR};
use crate::pipeline::emit::emit_declarations;
use crate::pipeline::error::{Error, ErrorExt, Result};
use crate::pipeline::settings::{GenerateOptions, OutputTarget};
use crate::pipeline::virtual_module::write_virtual_module;
use crate::pipeline::write::write_bundled_groups;
use crate::services::bundler::DeclarationBundler;
use crate::services::compiler::DeclarationCompiler;

/// Outcome of one output target.
#[derive(Debug)]
pub struct TargetReport {
    /// Public module name of the target
    pub root_module_name: String,
    /// Resolved output directory
    pub out_dir: PathBuf,
    /// Written declaration files, or why the target failed
    pub outcome: Result<Vec<PathBuf>>,
}

/// Outcome of a whole generation run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// One report per requested target, in request order
    pub targets: Vec<TargetReport>,
}

impl RunSummary {
    /// Whether every target produced its bundle.
    pub fn all_succeeded(&self) -> bool {
        self.targets.iter().all(|t| t.outcome.is_ok())
    }

    /// Number of failed targets.
    pub fn failed_count(&self) -> usize {
        self.targets.iter().filter(|t| t.outcome.is_err()).count()
    }
}

/// Drives discovery, emission, synthesis, bundling and writing for every
/// requested output target.
pub struct Generator<C, B> {
    compiler: C,
    bundler: B,
}

impl<C: DeclarationCompiler, B: DeclarationBundler> Generator<C, B> {
    /// Creates a generator over the given tool implementations.
    pub fn new(compiler: C, bundler: B) -> Self {
        Self { compiler, bundler }
    }

    /// Runs the pipeline for every output target.
    ///
    /// Failures are recorded per target in the returned summary; the run
    /// keeps going so one broken target cannot block the others.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntryDirUnreadable`] immediately, aborting the
    /// remaining targets.
    pub async fn generate(&self, options: &GenerateOptions) -> Result<RunSummary> {
        log::info!("{}", self.compiler.describe());
        log::info!("{}", self.bundler.describe());

        let mut summary = RunSummary::default();
        for target in &options.output {
            let out_dir = target.resolved_out_dir(&options.root_dir);
            log::info!(
                "Generating declaration bundle '{}' in {}",
                target.root_module_name,
                out_dir.display()
            );

            let outcome = self
                .generate_target(&options.root_dir, &out_dir, target)
                .await;
            match outcome {
                Err(e @ Error::EntryDirUnreadable { .. }) => return Err(e),
                outcome => {
                    if let Err(e) = &outcome {
                        log::error!("Failed to generate '{}': {e}", target.root_module_name);
                    }
                    summary.targets.push(TargetReport {
                        root_module_name: target.root_module_name.clone(),
                        out_dir,
                        outcome,
                    });
                }
            }
        }
        Ok(summary)
    }

    /// Runs the stages for one target, sweeping intermediates on every exit
    /// path.
    async fn generate_target(
        &self,
        root_dir: &Path,
        out_dir: &Path,
        target: &OutputTarget,
    ) -> Result<Vec<PathBuf>> {
        let entries = discover_entries(root_dir).await?;
        if entries.is_empty() {
            log::warn!(
                "No entry modules found under {}",
                root_dir.join(ENTRY_DIR).display()
            );
        }
        fs::create_dir_all(out_dir)
            .await
            .fs_context("creating output directory", out_dir)?;

        let mut cleanup = CleanupSet::new();
        let result = self
            .run_stages(root_dir, out_dir, target, &entries, &mut cleanup)
            .await;
        cleanup.sweep().await;
        result
    }

    async fn run_stages(
        &self,
        root_dir: &Path,
        out_dir: &Path,
        target: &OutputTarget,
        entries: &EntryMap,
        cleanup: &mut CleanupSet,
    ) -> Result<Vec<PathBuf>> {
        // 1. Emit the unbundled declaration file.
        let declaration_file =
            emit_declarations(&self.compiler, root_dir, out_dir, target, cleanup).await?;

        // 2. Synthesize the umbrella module over the discovered entries.
        let virtual_module_file = write_virtual_module(out_dir, entries, cleanup).await?;

        // 3. Bundle both behind the umbrella and persist the groups.
        let groups = bundle_declarations(
            &self.bundler,
            &declaration_file,
            &virtual_module_file,
            out_dir,
            target,
        )
        .await?;
        write_bundled_groups(&groups, target).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(name: &str, outcome: Result<Vec<PathBuf>>) -> TargetReport {
        TargetReport {
            root_module_name: name.to_string(),
            out_dir: PathBuf::from("/out"),
            outcome,
        }
    }

    #[test]
    fn test_summary_counts_failures() {
        let summary = RunSummary {
            targets: vec![
                report("a", Ok(vec![PathBuf::from("/out/a.d.ts")])),
                report("b", Err(Error::GenericError("bundling broke".into()))),
            ],
        };
        assert!(!summary.all_succeeded());
        assert_eq!(summary.failed_count(), 1);
    }

    #[test]
    fn test_empty_summary_counts_as_success() {
        let summary = RunSummary::default();
        assert!(summary.all_succeeded());
        assert_eq!(summary.failed_count(), 0);
    }
}
