//! Command line argument parsing and validation.
//!
//! Two invocation forms are supported: a single output target described
//! entirely by flags, or a JSON configuration file describing one or many
//! targets. Tool overrides apply to both forms.

use clap::Parser;
use std::path::{Path, PathBuf};

use crate::error::CliError;
use crate::pipeline::settings::{GenerateOptions, OutputTargetBuilder};
use crate::services::DEFAULT_BUNDLER_MODULE;

/// Declaration bundle generator for modular TypeScript packages
#[derive(Parser, Debug)]
#[command(
    name = "declbundle",
    version,
    about = "Declaration bundle generator for modular TypeScript packages",
    long_about = "Compiles the entry modules under <root>/exports into declaration files and bundles them into a single .d.ts published under a chosen module name.

Usage:
  declbundle --root . --out-dir dist --module-name myLib
  declbundle --root pkg --out-dir dist --module-name @scope/lib --use-path-name
  declbundle --config bundle-targets.json

Exit code 0 = every requested bundle exists at its output path."
)]
pub struct Args {
    /// Source root containing tsconfig.json and the exports directory
    #[arg(short, long, value_name = "DIR", required_unless_present = "config")]
    pub root: Option<PathBuf>,

    /// JSON configuration file describing one or many output targets
    #[arg(
        short,
        long,
        value_name = "FILE",
        conflicts_with_all = [
            "out_dir",
            "module_name",
            "use_path_name",
            "retain_external_types",
            "external_libs",
            "redistribute",
        ]
    )]
    pub config: Option<PathBuf>,

    /// Directory the bundled declaration file is written to
    #[arg(short, long, value_name = "DIR", required_unless_present = "config")]
    pub out_dir: Option<PathBuf>,

    /// Public module name the bundle is published under
    #[arg(short, long, value_name = "NAME", required_unless_present = "config")]
    pub module_name: Option<String>,

    /// Quote the module name as a path string in the rewritten header
    /// instead of emitting a bare identifier
    #[arg(long)]
    pub use_path_name: bool,

    /// Keep ambient type files copied into the output directory after the
    /// run instead of deleting them with the other intermediates
    #[arg(long)]
    pub retain_external_types: bool,

    /// External library whose types are inlined into the bundle even though
    /// no entry re-exports them (repeatable)
    #[arg(long = "external-lib", value_name = "MODULE")]
    pub external_libs: Vec<String>,

    /// Move non-exported symbols whose defining module matches PATTERN into
    /// MODULE (repeatable)
    #[arg(long, value_name = "PATTERN=MODULE")]
    pub redistribute: Vec<String>,

    /// Path to the TypeScript compiler binary (default: tsc on PATH)
    #[arg(long, value_name = "PATH")]
    pub tsc: Option<PathBuf>,

    /// Path to the Node runtime binary (default: node on PATH)
    #[arg(long, value_name = "PATH")]
    pub node: Option<PathBuf>,

    /// Node module that performs the declaration bundling
    #[arg(long, value_name = "MODULE", default_value = DEFAULT_BUNDLER_MODULE)]
    pub bundler_module: String,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.module_name {
            if name.is_empty() {
                return Err("Module name cannot be empty".to_string());
            }
        }

        for rule in &self.redistribute {
            if !matches!(rule.split_once('='), Some((pattern, module)) if !pattern.is_empty() && !module.is_empty())
            {
                return Err(format!(
                    "Invalid redistribution rule: {rule}. Expected PATTERN=MODULE"
                ));
            }
        }

        Ok(())
    }

    /// Builds the generation options from either invocation form.
    ///
    /// # Errors
    ///
    /// Fails when the configuration file cannot be read or parsed, or when
    /// no source root was provided by either the flags or the file.
    pub async fn load_options(&self) -> crate::error::Result<GenerateOptions> {
        match &self.config {
            Some(config_path) => self.load_config_file(config_path).await,
            None => self.build_single_target(),
        }
    }

    async fn load_config_file(&self, config_path: &Path) -> crate::error::Result<GenerateOptions> {
        let text = tokio::fs::read_to_string(config_path)
            .await
            .map_err(|e| CliError::ConfigFile {
                path: config_path.to_path_buf(),
                reason: e.to_string(),
            })?;
        let mut options: GenerateOptions =
            serde_json::from_str(&text).map_err(|e| CliError::ConfigFile {
                path: config_path.to_path_buf(),
                reason: e.to_string(),
            })?;

        // the flag wins over the file's rootDir
        if let Some(root) = &self.root {
            options.root_dir = root.clone();
        }
        if options.root_dir.as_os_str().is_empty() {
            return Err(CliError::MissingArgument {
                argument: "root".to_string(),
            }
            .into());
        }
        Ok(options)
    }

    fn build_single_target(&self) -> crate::error::Result<GenerateOptions> {
        let root = self.root.clone().ok_or_else(|| CliError::MissingArgument {
            argument: "root".to_string(),
        })?;
        let out_dir = self.out_dir.clone().ok_or_else(|| CliError::MissingArgument {
            argument: "out-dir".to_string(),
        })?;
        let module_name = self
            .module_name
            .clone()
            .ok_or_else(|| CliError::MissingArgument {
                argument: "module-name".to_string(),
            })?;

        let mut builder = OutputTargetBuilder::new()
            .out_dir(out_dir)
            .root_module_name(module_name)
            .use_path_for_root_module_name(self.use_path_name)
            .retain_external_types(self.retain_external_types);
        for lib in &self.external_libs {
            builder = builder.non_exported_external_lib(lib);
        }
        for rule in &self.redistribute {
            let (pattern, module) =
                rule.split_once('=')
                    .ok_or_else(|| CliError::InvalidArguments {
                        reason: format!(
                            "invalid redistribution rule '{rule}', expected PATTERN=MODULE"
                        ),
                    })?;
            builder = builder.redistribute(pattern, module);
        }

        let target = builder.build()?;
        Ok(GenerateOptions::single(root, target))
    }
}
