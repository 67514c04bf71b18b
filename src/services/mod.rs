//! External tool integration.
//!
//! The pipeline talks to the TypeScript world through two seams: a
//! [`DeclarationCompiler`](compiler::DeclarationCompiler) that emits an
//! unbundled declaration file, and a
//! [`DeclarationBundler`](bundler::DeclarationBundler) that merges it into
//! grouped output modules. Production implementations shell out to `tsc`
//! and `node`; tests substitute in-process fakes.

pub mod bundler;
pub mod compiler;

pub use bundler::{
    BundleRequest, BundledGroup, DeclarationBundler, GroupSpec, NodeBundler,
    DEFAULT_BUNDLER_MODULE,
};
pub use compiler::{CompileReport, CompileRequest, DeclarationCompiler, TscCompiler};

/// Asks a tool binary for its version string.
///
/// Returns `None` when the probe fails; callers fall back to reporting the
/// binary path instead.
pub(crate) fn probe_version(path: &std::path::Path, arg: &str) -> Option<String> {
    match std::process::Command::new(path).arg(arg).output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if version.is_empty() { None } else { Some(version) }
        }
        Ok(output) => {
            log::warn!(
                "Version probe for {} exited with {}",
                path.display(),
                output.status
            );
            None
        }
        Err(e) => {
            log::warn!("Version probe for {} failed: {e}", path.display());
            None
        }
    }
}
