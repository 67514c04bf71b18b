//! Declaration compiler seam.
//!
//! [`TscCompiler`] is the production implementation: it shells out to the
//! TypeScript compiler, asks it for a single concatenated declaration file
//! and parses the plain-format diagnostics it prints. The pipeline never
//! inspects the exit status; whether compilation "worked" is decided by the
//! caller from the artifacts on disk and the diagnostics in the report.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use tokio::process::Command;

use crate::pipeline::diagnostics::{Diagnostic, Severity};
use crate::pipeline::error::{Error, Result};

/// One declaration emission run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    /// Project configuration the compiler loads
    pub tsconfig_path: PathBuf,
    /// Concatenated JavaScript output path; the declaration file the
    /// pipeline consumes is derived from it by the compiler
    pub out_file: PathBuf,
}

/// What the compiler reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileReport {
    /// Diagnostics in the order they were emitted
    pub diagnostics: Vec<Diagnostic>,
}

/// Emits declaration files for a project.
#[allow(async_fn_in_trait)]
pub trait DeclarationCompiler {
    /// Human-readable description of the tool, logged once per run.
    fn describe(&self) -> String;

    /// Runs the compiler for `request`.
    ///
    /// # Errors
    ///
    /// Fails only when the tool could not be executed at all; a run that
    /// finished with compile errors still returns a report.
    async fn compile(&self, request: &CompileRequest) -> Result<CompileReport>;
}

/// Matches plain-format compiler output, with or without a source location:
/// `src/a.ts(3,7): error TS2304: Cannot find name 'x'.`
static DIAGNOSTIC_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?P<file>.+?)\((?P<line>\d+),(?P<col>\d+)\): )?(?P<severity>error|warning|message|suggestion) TS\d+: (?P<message>.*)$",
    )
    .unwrap_or_else(|e| panic!("invalid diagnostic pattern: {e}"))
});

/// The `tsc` command-line compiler.
#[derive(Debug, Clone)]
pub struct TscCompiler {
    tsc_path: PathBuf,
    version: Option<String>,
}

impl TscCompiler {
    /// Locates `tsc` on PATH.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ToolNotFound`] when the binary is missing.
    pub fn locate() -> Result<Self> {
        let tsc_path = which::which("tsc").map_err(|source| Error::ToolNotFound {
            tool: "tsc".to_string(),
            source,
        })?;
        Ok(Self::at(tsc_path))
    }

    /// Uses the compiler at an explicit path.
    pub fn at(tsc_path: impl Into<PathBuf>) -> Self {
        let tsc_path = tsc_path.into();
        let version = super::probe_version(&tsc_path, "--version")
            .map(|v| v.trim_start_matches("Version ").to_string());
        Self { tsc_path, version }
    }

    fn parse_output(output: &str) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for line in output.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            match DIAGNOSTIC_LINE.captures(line) {
                Some(caps) => {
                    let severity = match &caps["severity"] {
                        "error" => Severity::Error,
                        "warning" => Severity::Warning,
                        "suggestion" => Severity::Suggestion,
                        _ => Severity::Message,
                    };
                    let mut diagnostic = Diagnostic::new(severity, &caps["message"]);
                    if let (Some(file), Some(line), Some(col)) =
                        (caps.name("file"), caps.name("line"), caps.name("col"))
                    {
                        let line = line.as_str().parse().unwrap_or(0);
                        let col = col.as_str().parse().unwrap_or(0);
                        diagnostic = diagnostic.with_location(file.as_str(), line, col);
                    }
                    diagnostics.push(diagnostic);
                }
                // tsc also prints summary and watch-mode lines; relay them
                // verbatim as informational.
                None => diagnostics.push(Diagnostic::new(Severity::Message, line)),
            }
        }
        diagnostics
    }
}

impl DeclarationCompiler for TscCompiler {
    fn describe(&self) -> String {
        match &self.version {
            Some(version) => format!("TypeScript version: {version}"),
            None => format!("TypeScript compiler: {}", self.tsc_path.display()),
        }
    }

    async fn compile(&self, request: &CompileRequest) -> Result<CompileReport> {
        let output = Command::new(&self.tsc_path)
            .arg("--project")
            .arg(&request.tsconfig_path)
            .arg("--outFile")
            .arg(&request.out_file)
            .args(["--declaration", "true"])
            .args(["--emitDeclarationOnly", "true"])
            .args(["--noEmit", "false"])
            .args(["--pretty", "false"])
            .output()
            .await
            .map_err(|error| Error::CommandFailed {
                command: self.tsc_path.display().to_string(),
                error,
            })?;

        let mut diagnostics = Self::parse_output(&String::from_utf8_lossy(&output.stdout));
        diagnostics.extend(Self::parse_output(&String::from_utf8_lossy(&output.stderr)));
        Ok(CompileReport { diagnostics })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_located_diagnostics() {
        let diagnostics = TscCompiler::parse_output(
            "exports/audio.ts(3,7): error TS2304: Cannot find name 'AudioCtx'.\n\
             exports/core.ts(10,1): warning TS6133: 'x' is declared but never used.\n",
        );
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(diagnostics[0].file.as_deref(), Some("exports/audio.ts"));
        assert_eq!(diagnostics[0].line, Some(3));
        assert_eq!(diagnostics[0].column, Some(7));
        assert_eq!(diagnostics[0].message, "Cannot find name 'AudioCtx'.");
        assert_eq!(diagnostics[1].severity, Severity::Warning);
    }

    #[test]
    fn test_parse_global_diagnostic_without_location() {
        let diagnostics =
            TscCompiler::parse_output("error TS5053: Option 'outFile' cannot be specified.\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(diagnostics[0].file, None);
        assert_eq!(
            diagnostics[0].message,
            "Option 'outFile' cannot be specified."
        );
    }

    #[test]
    fn test_parse_relays_unrecognized_lines_as_messages() {
        let diagnostics = TscCompiler::parse_output("\nSomething unexpected happened\n\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Message);
        assert_eq!(diagnostics[0].message, "Something unexpected happened");
    }

    #[test]
    fn test_parse_windows_paths_with_parens() {
        let diagnostics = TscCompiler::parse_output(
            "C:/work/pkg/exports/data (copy).ts(1,1): error TS1005: ';' expected.\n",
        );
        assert_eq!(
            diagnostics[0].file.as_deref(),
            Some("C:/work/pkg/exports/data (copy).ts")
        );
        assert_eq!(diagnostics[0].line, Some(1));
    }
}
