//! Output writing.
//!
//! The bundler emits each group under the umbrella module's name; before
//! the text reaches disk its module header is rewritten to the target's
//! public root module name, either as a bare identifier or as a quoted
//! path string.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tokio::fs;

use crate::pipeline::error::{ErrorExt, Result};
use crate::pipeline::settings::OutputTarget;
use crate::services::bundler::BundledGroup;

/// Matches the first ambient module header, quoted form:
/// `module "declx" {`.
static MODULE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(module\s+)"(.*)"(\s+\{)"#)
        .unwrap_or_else(|e| panic!("invalid module header pattern: {e}"))
});

/// Rewrites the first quoted module header to the public root module name.
///
/// With `use_path_name` the name stays a (single-quoted) path string;
/// otherwise it becomes a bare identifier.
pub fn rewrite_module_header(code: &str, root_module_name: &str, use_path_name: bool) -> String {
    MODULE_HEADER
        .replace(code, |caps: &Captures| {
            let name = if use_path_name {
                format!("'{root_module_name}'")
            } else {
                root_module_name.to_string()
            };
            format!("{}{}{}", &caps[1], name, &caps[3])
        })
        .into_owned()
}

/// Rewrites and persists every bundled group.
///
/// Parent directories are created as needed. Returns the written paths.
pub async fn write_bundled_groups(
    groups: &[BundledGroup],
    target: &OutputTarget,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(groups.len());
    for group in groups {
        let code = rewrite_module_header(
            &group.code,
            &target.root_module_name,
            target.use_path_for_root_module_name,
        );
        if let Some(parent) = group.path.parent() {
            fs::create_dir_all(parent)
                .await
                .fs_context("creating output directory", parent)?;
        }
        fs::write(&group.path, code)
            .await
            .fs_context("writing bundled declaration", &group.path)?;
        log::info!("✓ Created {}", group.path.display());
        written.push(group.path.clone());
    }
    Ok(written)
}
