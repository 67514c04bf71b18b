//! Builder for [`OutputTarget`] values assembled from CLI flags.

use std::path::PathBuf;

use crate::pipeline::error::{Context, Result};
use crate::pipeline::settings::{OutputTarget, RedistributionRule};

/// Builds an [`OutputTarget`] field by field.
///
/// # Examples
///
/// ```
/// use declbundle::pipeline::settings::OutputTargetBuilder;
///
/// let target = OutputTargetBuilder::new()
///     .out_dir("dist")
///     .root_module_name("myLib")
///     .build()
///     .unwrap();
/// assert_eq!(target.root_module_name, "myLib");
/// ```
#[derive(Debug, Default)]
pub struct OutputTargetBuilder {
    out_dir: Option<PathBuf>,
    root_module_name: Option<String>,
    non_exported_external_libs: Vec<String>,
    symbol_redistribution: Vec<RedistributionRule>,
    use_path_for_root_module_name: bool,
    retain_external_types: bool,
}

impl OutputTargetBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the output directory.
    pub fn out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(out_dir.into());
        self
    }

    /// Sets the published module name.
    pub fn root_module_name(mut self, name: impl Into<String>) -> Self {
        self.root_module_name = Some(name.into());
        self
    }

    /// Adds an external library whose types are force-inlined.
    pub fn non_exported_external_lib(mut self, lib: impl Into<String>) -> Self {
        self.non_exported_external_libs.push(lib.into());
        self
    }

    /// Adds a symbol redistribution rule.
    pub fn redistribute(
        mut self,
        source_module: impl Into<String>,
        target_module: impl Into<String>,
    ) -> Self {
        self.symbol_redistribution.push(RedistributionRule {
            source_module: source_module.into(),
            target_module: target_module.into(),
        });
        self
    }

    /// Quotes the root module name as a path in the rewritten header.
    pub fn use_path_for_root_module_name(mut self, value: bool) -> Self {
        self.use_path_for_root_module_name = value;
        self
    }

    /// Keeps copied ambient type files after the run.
    pub fn retain_external_types(mut self, value: bool) -> Self {
        self.retain_external_types = value;
        self
    }

    /// Builds the target.
    ///
    /// # Errors
    ///
    /// Returns an error when `out_dir` or `root_module_name` was never set.
    pub fn build(self) -> Result<OutputTarget> {
        Ok(OutputTarget {
            out_dir: self.out_dir.context("outDir is required")?,
            root_module_name: self
                .root_module_name
                .context("rootModuleName is required")?,
            non_exported_external_libs: self.non_exported_external_libs,
            symbol_redistribution: self.symbol_redistribution,
            use_path_for_root_module_name: self.use_path_for_root_module_name,
            retain_external_types: self.retain_external_types,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_requires_out_dir() {
        let err = OutputTargetBuilder::new()
            .root_module_name("myLib")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("outDir is required"));
    }

    #[test]
    fn test_build_requires_root_module_name() {
        let err = OutputTargetBuilder::new().out_dir("dist").build().unwrap_err();
        assert!(err.to_string().contains("rootModuleName is required"));
    }

    #[test]
    fn test_build_full_target() {
        let target = OutputTargetBuilder::new()
            .out_dir("dist")
            .root_module_name("myLib")
            .non_exported_external_lib("csstype")
            .redistribute("^helpers", "myLib")
            .use_path_for_root_module_name(true)
            .retain_external_types(true)
            .build()
            .unwrap();
        assert_eq!(target.non_exported_external_libs, vec!["csstype"]);
        assert_eq!(target.symbol_redistribution.len(), 1);
        assert!(target.use_path_for_root_module_name);
        assert!(target.retain_external_types);
    }
}
