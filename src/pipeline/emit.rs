//! Declaration emission.
//!
//! Drives the declaration compiler against the project configuration,
//! collecting its diagnostics and locating the consolidated declaration
//! file it leaves behind. Diagnostics are advisory: the stage fails only
//! when the declaration artifact is missing afterwards. Ambient type files
//! named by the project configuration are copied next to the future bundle
//! so consumers resolve them without the package sources.

use std::path::{Component, Path, PathBuf};
use tokio::fs;

use crate::pipeline::cleanup::CleanupSet;
use crate::pipeline::error::{Context, Error, ErrorExt, Result};
use crate::pipeline::settings::OutputTarget;
use crate::pipeline::tsconfig::load_project_config;
use crate::services::compiler::{CompileRequest, DeclarationCompiler};

/// Concatenated JavaScript output path handed to the compiler. Nothing is
/// emitted there; the declaration artifact names derive from it.
pub const UNBUNDLED_OUT_FILE: &str = "before-rollup.js";

/// Unbundled declaration file the compiler produces.
pub const DECLARATION_FILE: &str = "before-rollup.d.ts";

/// Runs the declaration compiler and returns the path of the unbundled
/// declaration file.
///
/// Stale artifacts from a previous run are deleted first so a rerun starts
/// clean. The declaration file and its source map (when present) are
/// tracked as intermediates.
///
/// # Errors
///
/// Fails when the computed output path is not a `.js` path, when the
/// project configuration cannot be loaded, when the compiler cannot be
/// executed, or when no declaration file exists after the compiler ran.
pub async fn emit_declarations<C: DeclarationCompiler>(
    compiler: &C,
    root_dir: &Path,
    out_dir: &Path,
    target: &OutputTarget,
    cleanup: &mut CleanupSet,
) -> Result<PathBuf> {
    let output_js_path = out_dir.join(UNBUNDLED_OUT_FILE);
    let extension = output_js_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_string();
    if extension != "js" {
        log::error!(
            "Unexpected output extension {:?}, please check it.",
            extension
        );
        return Err(Error::UnexpectedOutputExtension {
            path: output_js_path,
            extension,
        });
    }

    let declaration_file = out_dir.join(DECLARATION_FILE);
    let declaration_map_file = append_extension(&declaration_file, ".map");

    // 1. Delete leftovers of a previous run so reruns start clean.
    for stale in [&output_js_path, &declaration_file, &declaration_map_file] {
        match fs::remove_file(stale).await {
            Ok(()) => log::info!("Delete old {}.", stale.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(Error::Fs {
                    operation: "removing stale artifact".to_string(),
                    path: stale.to_path_buf(),
                    source,
                });
            }
        }
    }

    // 2. Compile declarations.
    let config = load_project_config(root_dir).await?;
    log::info!("Generating...");
    let report = compiler
        .compile(&CompileRequest {
            tsconfig_path: config.tsconfig_path.clone(),
            out_file: output_js_path.clone(),
        })
        .await?;
    for diagnostic in &report.diagnostics {
        diagnostic.log();
    }

    // 3. Success is decided by the artifact, not the diagnostics.
    if !fs::try_exists(&declaration_file).await.unwrap_or(false) {
        log::error!("Failed to compile.");
        return Err(Error::CompileFailed {
            path: declaration_file,
        });
    }
    cleanup.track(&declaration_file);
    if fs::try_exists(&declaration_map_file).await.unwrap_or(false) {
        cleanup.track(&declaration_map_file);
    }

    // 4. Bring the ambient type files along.
    copy_external_types(
        root_dir,
        out_dir,
        &config.types,
        target.retain_external_types,
        cleanup,
    )
    .await?;

    Ok(declaration_file)
}

/// Copies each ambient type file named in `compilerOptions.types` under the
/// output directory.
///
/// Relative type roots keep their directory structure below the output
/// directory; absolute ones are flattened to their base name. Unless
/// retention is requested, the copies are tracked for removal.
async fn copy_external_types(
    root_dir: &Path,
    out_dir: &Path,
    types: &[String],
    retain: bool,
    cleanup: &mut CleanupSet,
) -> Result<()> {
    for type_root in types {
        let relative = format!("{type_root}.d.ts");
        let (source, dest) = if Path::new(&relative).is_absolute() {
            let source = PathBuf::from(&relative);
            let file_name = source
                .file_name()
                .with_context(|| format!("ambient type path {relative} has no file name"))?
                .to_os_string();
            let dest = out_dir.join(file_name);
            (source, dest)
        } else {
            (root_dir.join(&relative), out_dir.join(&relative))
        };

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .await
                .fs_context("creating ambient type directory", parent)?;
        }
        fs::copy(&source, &dest)
            .await
            .fs_context("copying ambient type file", &source)?;
        log::debug!("Copied {} -> {}", source.display(), dest.display());

        if !retain {
            cleanup.track(tracked_type_path(out_dir, &dest));
        }
    }
    Ok(())
}

/// Chooses what to track for a copied ambient type file: the top-most
/// directory it created under the output directory, or the file itself when
/// it sits directly inside. Never the output directory or anything above it.
fn tracked_type_path(out_dir: &Path, dest: &Path) -> PathBuf {
    let Ok(relative) = dest.strip_prefix(out_dir) else {
        return dest.to_path_buf();
    };
    match relative.components().next() {
        Some(Component::Normal(first)) => {
            let top = out_dir.join(first);
            if top == dest { dest.to_path_buf() } else { top }
        }
        _ => dest.to_path_buf(),
    }
}

fn append_extension(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracked_type_path_nested() {
        let out_dir = Path::new("/out");
        assert_eq!(
            tracked_type_path(out_dir, Path::new("/out/typings/custom.d.ts")),
            PathBuf::from("/out/typings")
        );
        assert_eq!(
            tracked_type_path(out_dir, Path::new("/out/a/b/c.d.ts")),
            PathBuf::from("/out/a")
        );
    }

    #[test]
    fn test_tracked_type_path_flat_file_is_tracked_itself() {
        let out_dir = Path::new("/out");
        assert_eq!(
            tracked_type_path(out_dir, Path::new("/out/custom.d.ts")),
            PathBuf::from("/out/custom.d.ts")
        );
    }

    #[test]
    fn test_tracked_type_path_never_escapes_out_dir() {
        let out_dir = Path::new("/out");
        assert_eq!(
            tracked_type_path(out_dir, Path::new("/elsewhere/custom.d.ts")),
            PathBuf::from("/elsewhere/custom.d.ts")
        );
        assert_eq!(
            tracked_type_path(out_dir, Path::new("/out")),
            PathBuf::from("/out")
        );
    }

    #[test]
    fn test_append_extension() {
        assert_eq!(
            append_extension(Path::new("/out/before-rollup.d.ts"), ".map"),
            PathBuf::from("/out/before-rollup.d.ts.map")
        );
    }

    #[tokio::test]
    async fn test_copy_external_types_preserves_relative_structure() {
        let root = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("typings")).unwrap();
        std::fs::write(
            root.path().join("typings/custom.d.ts"),
            "declare const custom: string;",
        )
        .unwrap();

        let mut cleanup = CleanupSet::new();
        copy_external_types(
            root.path(),
            out.path(),
            &["typings/custom".to_string()],
            false,
            &mut cleanup,
        )
        .await
        .unwrap();

        assert!(out.path().join("typings/custom.d.ts").exists());
        assert_eq!(cleanup.tracked(), &[out.path().join("typings")]);
    }

    #[tokio::test]
    async fn test_copy_external_types_flattens_absolute_sources() {
        let elsewhere = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let source = elsewhere.path().join("global.d.ts");
        std::fs::write(&source, "declare const g: number;").unwrap();
        let type_root = elsewhere.path().join("global").display().to_string();

        let mut cleanup = CleanupSet::new();
        copy_external_types(
            Path::new("/unused-root"),
            out.path(),
            &[type_root],
            true,
            &mut cleanup,
        )
        .await
        .unwrap();

        assert!(out.path().join("global.d.ts").exists());
        // retention requested, nothing tracked
        assert!(cleanup.tracked().is_empty());
    }

    #[tokio::test]
    async fn test_copy_external_types_missing_source_fails() {
        let root = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();

        let mut cleanup = CleanupSet::new();
        let err = copy_external_types(
            root.path(),
            out.path(),
            &["typings/custom".to_string()],
            false,
            &mut cleanup,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("copying ambient type file"));
    }
}
