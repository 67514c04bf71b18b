//! Umbrella module synthesis.
//!
//! The bundler needs a single root module that reaches every public entry.
//! No such module exists in the sources, so the pipeline renders one: an
//! ambient `declare module` block re-exporting each discovered entry, written
//! to the output directory for the duration of the run.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::pipeline::cleanup::CleanupSet;
use crate::pipeline::discovery::{EntryMap, UMBRELLA_MODULE};
use crate::pipeline::error::{ErrorExt, Result};

/// File name of the synthesized umbrella module.
pub const VIRTUAL_MODULE_FILE: &str = "virtual-dts.d.ts";

/// Renders the ambient umbrella module re-exporting every entry.
///
/// Entries appear in map order, one `export *` line each.
pub fn render_umbrella_module(entries: &EntryMap) -> String {
    let mut content = format!("declare module '{UMBRELLA_MODULE}' {{\n");
    for entry in entries.iter() {
        let _ = writeln!(content, "    export * from \"{}\";", entry.module_path);
    }
    content.push('}');
    content
}

/// Writes the umbrella module into the output directory and tracks it for
/// removal after the run.
pub async fn write_virtual_module(
    out_dir: &Path,
    entries: &EntryMap,
    cleanup: &mut CleanupSet,
) -> Result<PathBuf> {
    let path = out_dir.join(VIRTUAL_MODULE_FILE);
    fs::write(&path, render_umbrella_module(entries))
        .await
        .fs_context("writing virtual module", &path)?;
    cleanup.track(&path);
    log::debug!("Created virtual module {}", path.display());
    Ok(path)
}
