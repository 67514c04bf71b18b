//! Per-output bundling target.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Redistribution rule for symbols that are not exported from the entry
/// modules but still referenced by the bundled declarations.
///
/// Every symbol whose defining module matches `source_module` is moved into
/// `target_module` instead of being dropped from the bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedistributionRule {
    /// Regular expression matched against the defining module of a symbol
    pub source_module: String,
    /// Module the matched symbols are emitted into
    pub target_module: String,
}

/// Settings for one bundled declaration output.
///
/// A generation run can carry several targets; each one produces a single
/// `.d.ts` file under its own output directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputTarget {
    /// Directory the bundled declaration file is written to.
    ///
    /// Relative paths are resolved against the source root.
    pub out_dir: PathBuf,
    /// Module name the bundle is published under
    pub root_module_name: String,
    /// External libraries whose types are inlined into the bundle even
    /// though the entry modules never re-export them.
    ///
    /// Default: empty.
    #[serde(default)]
    pub non_exported_external_libs: Vec<String>,
    /// Rules moving non-exported symbols into named modules.
    ///
    /// Default: empty.
    #[serde(default, alias = "nonExportedSymbolDistribution")]
    pub symbol_redistribution: Vec<RedistributionRule>,
    /// Whether the rewritten module header quotes the root module name as a
    /// path (`module 'name'`) instead of a bare identifier (`module name`).
    ///
    /// Default: false.
    #[serde(default)]
    pub use_path_for_root_module_name: bool,
    /// Whether ambient type files copied next to the bundle survive cleanup.
    ///
    /// Default: false.
    #[serde(default, alias = "needCopyExternalTypes")]
    pub retain_external_types: bool,
}

impl OutputTarget {
    /// Resolves the output directory against the source root.
    ///
    /// Absolute directories are taken as-is so the same target definition
    /// works no matter which directory the tool is launched from.
    pub fn resolved_out_dir(&self, root: &Path) -> PathBuf {
        if self.out_dir.is_absolute() {
            self.out_dir.clone()
        } else {
            root.join(&self.out_dir)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_target() {
        let target: OutputTarget = serde_json::from_str(
            r#"{ "outDir": "dist", "rootModuleName": "myLib" }"#,
        )
        .unwrap();
        assert_eq!(target.out_dir, PathBuf::from("dist"));
        assert_eq!(target.root_module_name, "myLib");
        assert!(target.non_exported_external_libs.is_empty());
        assert!(target.symbol_redistribution.is_empty());
        assert!(!target.use_path_for_root_module_name);
        assert!(!target.retain_external_types);
    }

    #[test]
    fn test_deserialize_accepts_legacy_field_names() {
        let target: OutputTarget = serde_json::from_str(
            r#"{
                "outDir": "dist",
                "rootModuleName": "myLib",
                "nonExportedSymbolDistribution": [
                    { "sourceModule": "^internal", "targetModule": "myLib" }
                ],
                "needCopyExternalTypes": true
            }"#,
        )
        .unwrap();
        assert_eq!(target.symbol_redistribution.len(), 1);
        assert_eq!(target.symbol_redistribution[0].source_module, "^internal");
        assert!(target.retain_external_types);
    }

    #[test]
    fn test_resolved_out_dir() {
        let target: OutputTarget = serde_json::from_str(
            r#"{ "outDir": "dist/types", "rootModuleName": "myLib" }"#,
        )
        .unwrap();
        assert_eq!(
            target.resolved_out_dir(Path::new("/project")),
            PathBuf::from("/project/dist/types")
        );

        let absolute: OutputTarget = serde_json::from_str(
            r#"{ "outDir": "/somewhere/else", "rootModuleName": "myLib" }"#,
        )
        .unwrap();
        assert_eq!(
            absolute.resolved_out_dir(Path::new("/project")),
            PathBuf::from("/somewhere/else")
        );
    }
}
