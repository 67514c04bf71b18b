//! Declaration bundler seam.
//!
//! The heavy lifting of merging declaration files lives in a JavaScript
//! library loaded at runtime. [`NodeBundler`] drives it through a small
//! embedded Node script: the request crosses stdin as JSON, the bundled
//! groups come back on stdout the same way, and anything on stderr becomes
//! the error message. Regular expressions travel as source strings and are
//! revived on the JavaScript side.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Stdio;

use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::pipeline::error::{Context, Error, Result};
use crate::pipeline::settings::RedistributionRule;

/// Bundler library loaded when no other module is configured.
pub const DEFAULT_BUNDLER_MODULE: &str = "tfig";

/// One output group of the bundle.
///
/// `test` is a regular expression source matched against entry names; every
/// entry it matches is emitted into the file at `path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSpec {
    /// Regular expression source selecting entries
    pub test: String,
    /// File the matched entries are bundled into
    pub path: PathBuf,
}

/// Everything the bundler needs for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleRequest {
    /// Declaration files fed into the bundler
    pub input: Vec<PathBuf>,
    /// Entry name to module name mapping
    pub entries: BTreeMap<String, String>,
    /// Output grouping rules
    pub groups: Vec<GroupSpec>,
    /// External libraries whose types are inlined even though no entry
    /// re-exports them
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub non_exported_external_libs: Vec<String>,
    /// Rules moving non-exported symbols into named modules
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub non_exported_symbol_distribution: Vec<RedistributionRule>,
}

/// One bundled output module.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BundledGroup {
    /// Where the group asked to be written
    pub path: PathBuf,
    /// Bundled declaration source
    pub code: String,
}

/// Merges declaration files into grouped output modules.
#[allow(async_fn_in_trait)]
pub trait DeclarationBundler {
    /// Human-readable description of the tool, logged once per run.
    fn describe(&self) -> String;

    /// Bundles the request into output groups.
    ///
    /// # Errors
    ///
    /// Fails when the bundler could not be executed or reported an error.
    async fn bundle(&self, request: &BundleRequest) -> Result<Vec<BundledGroup>>;
}

/// Driver script evaluated with `node -e`.
///
/// Reads the request from stdin, revives the regular expressions, calls the
/// configured module's `bundle()` and prints the groups as JSON.
const DRIVER_JS: &str = r#"
const chunks = [];
process.stdin.on('data', (chunk) => chunks.push(chunk));
process.stdin.on('end', () => {
    try {
        const payload = JSON.parse(Buffer.concat(chunks).toString('utf8'));
        const { bundle } = require(payload.module);
        if (typeof bundle !== 'function') {
            throw new Error('module ' + payload.module + ' does not export a bundle() function');
        }
        const options = {
            input: payload.input,
            entries: payload.entries,
            groups: payload.groups.map((group) => ({
                test: new RegExp(group.test),
                path: group.path,
            })),
        };
        if (payload.nonExportedExternalLibs) {
            options.nonExportedExternalLibs = payload.nonExportedExternalLibs;
        }
        if (payload.nonExportedSymbolDistribution) {
            options.nonExportedSymbolDistribution = payload.nonExportedSymbolDistribution.map((rule) => ({
                sourceModule: new RegExp(rule.sourceModule),
                targetModule: rule.targetModule,
            }));
        }
        Promise.resolve(bundle(options)).then((result) => {
            const groups = Array.isArray(result) ? result : result.groups;
            const out = groups.map((group) => ({
                path: String(group.path),
                code: String(group.code),
            }));
            process.stdout.write(JSON.stringify({ groups: out }));
        }).catch(fail);
    } catch (err) {
        fail(err);
    }
});
function fail(err) {
    console.error(err && err.stack ? err.stack : String(err));
    process.exit(1);
}
"#;

#[derive(Serialize)]
struct DriverRequest<'a> {
    module: &'a str,
    #[serde(flatten)]
    request: &'a BundleRequest,
}

#[derive(Deserialize)]
struct DriverResponse {
    groups: Vec<BundledGroup>,
}

/// Runs the bundler library inside a Node child process.
#[derive(Debug, Clone)]
pub struct NodeBundler {
    node_path: PathBuf,
    module_name: String,
    version: Option<String>,
    working_dir: Option<PathBuf>,
}

impl NodeBundler {
    /// Locates `node` on PATH.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ToolNotFound`] when the binary is missing.
    pub fn locate(module_name: impl Into<String>) -> Result<Self> {
        let node_path = which::which("node").map_err(|source| Error::ToolNotFound {
            tool: "node".to_string(),
            source,
        })?;
        Ok(Self::at(node_path, module_name))
    }

    /// Uses the Node runtime at an explicit path.
    pub fn at(node_path: impl Into<PathBuf>, module_name: impl Into<String>) -> Self {
        let node_path = node_path.into();
        let version = super::probe_version(&node_path, "--version");
        Self {
            node_path,
            module_name: module_name.into(),
            version,
            working_dir: None,
        }
    }

    /// Resolves the bundler module from `dir` instead of the process
    /// working directory.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

impl DeclarationBundler for NodeBundler {
    fn describe(&self) -> String {
        match &self.version {
            Some(version) => {
                format!("Node version: {version} (bundler module: {})", self.module_name)
            }
            None => format!(
                "Node runtime: {} (bundler module: {})",
                self.node_path.display(),
                self.module_name
            ),
        }
    }

    async fn bundle(&self, request: &BundleRequest) -> Result<Vec<BundledGroup>> {
        let payload = serde_json::to_vec(&DriverRequest {
            module: &self.module_name,
            request,
        })?;

        let mut command = Command::new(&self.node_path);
        command
            .args(["-e", DRIVER_JS])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        let mut child = command.spawn().map_err(|error| Error::CommandFailed {
            command: self.node_path.display().to_string(),
            error,
        })?;

        let mut stdin = child.stdin.take().context("bundler stdin unavailable")?;
        stdin.write_all(&payload).await?;
        drop(stdin);

        let output = child
            .wait_with_output()
            .await
            .map_err(|error| Error::CommandFailed {
                command: self.node_path.display().to_string(),
                error,
            })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr.trim();
            if reason.is_empty() {
                return Err(Error::Bundling(format!(
                    "bundler exited with {}",
                    output.status
                )));
            }
            return Err(Error::Bundling(reason.to_string()));
        }

        let response: DriverResponse = serde_json::from_slice(&output.stdout)?;
        Ok(response.groups)
    }
}
