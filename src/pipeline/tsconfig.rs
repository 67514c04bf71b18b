//! Project configuration loading.
//!
//! The pipeline only needs one thing from `tsconfig.json`: the ambient type
//! packages listed under `compilerOptions.types`, so it can copy their
//! declaration files next to the bundle. The file is parsed as JSON5 since
//! real-world tsconfig files carry comments and trailing commas.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tokio::fs;

use crate::pipeline::error::{Error, Result};

/// File name of the project configuration under the source root.
pub const PROJECT_CONFIG_FILE: &str = "tsconfig.json";

/// The slice of `tsconfig.json` the pipeline consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    /// The file the config was loaded from
    pub tsconfig_path: PathBuf,
    /// Ambient type packages from `compilerOptions.types`
    pub types: Vec<String>,
}

#[derive(Deserialize)]
struct RawTsConfig {
    #[serde(default, rename = "compilerOptions")]
    compiler_options: RawCompilerOptions,
}

#[derive(Default, Deserialize)]
struct RawCompilerOptions {
    types: Option<Vec<String>>,
}

/// Loads `<root>/tsconfig.json`.
///
/// # Errors
///
/// Returns [`Error::ProjectConfig`] when the file cannot be read or parsed.
pub async fn load_project_config(root: &Path) -> Result<ProjectConfig> {
    let tsconfig_path = root.join(PROJECT_CONFIG_FILE);
    let text = fs::read_to_string(&tsconfig_path)
        .await
        .map_err(|e| Error::ProjectConfig {
            path: tsconfig_path.clone(),
            reason: e.to_string(),
        })?;
    let raw: RawTsConfig = json5::from_str(&text).map_err(|e| Error::ProjectConfig {
        path: tsconfig_path.clone(),
        reason: e.to_string(),
    })?;
    Ok(ProjectConfig {
        tsconfig_path,
        types: raw.compiler_options.types.unwrap_or_default(),
    })
}
