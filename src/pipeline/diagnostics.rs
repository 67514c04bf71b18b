//! Compiler diagnostics surfaced during declaration emission.
//!
//! The declaration compiler reports problems as a flat list of
//! [`Diagnostic`] records. The pipeline relays every record to the log and
//! then decides success on artifacts alone: a run with error diagnostics
//! still proceeds when the declaration file was written.

use std::fmt;

/// Severity of a compiler diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Hard compile error
    Error,
    /// Warning
    Warning,
    /// Informational message
    Message,
    /// Suggested change
    Suggestion,
}

impl Severity {
    /// Log level the pipeline relays this severity at.
    ///
    /// Errors and warnings keep their level; informational severities
    /// collapse to `info`.
    pub fn log_level(self) -> log::Level {
        match self {
            Severity::Error => log::Level::Error,
            Severity::Warning => log::Level::Warn,
            Severity::Message | Severity::Suggestion => log::Level::Info,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Message => "message",
            Severity::Suggestion => "suggestion",
        };
        write!(f, "{name}")
    }
}

/// A single problem reported by the declaration compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// How severe the problem is
    pub severity: Severity,
    /// Source file the problem was reported against, when known
    pub file: Option<String>,
    /// 1-based line within `file`
    pub line: Option<u32>,
    /// 1-based column within `line`
    pub column: Option<u32>,
    /// Human-readable description
    pub message: String,
}

impl Diagnostic {
    /// Creates a diagnostic without source location.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            file: None,
            line: None,
            column: None,
            message: message.into(),
        }
    }

    /// Attaches a source location.
    pub fn with_location(mut self, file: impl Into<String>, line: u32, column: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Relays this diagnostic to the log at the level matching its severity.
    pub fn log(&self) {
        log::log!(self.severity.log_level(), "{self}");
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.line, self.column) {
            (Some(file), Some(line), Some(column)) => {
                write!(f, "{file} ({line},{column}): {}", self.message)
            }
            (Some(file), _, _) => write!(f, "{file}: {}", self.message),
            _ => write!(f, "{}", self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_location() {
        let diag = Diagnostic::new(Severity::Error, "Cannot find name 'foo'.")
            .with_location("exports/audio.ts", 12, 5);
        assert_eq!(
            diag.to_string(),
            "exports/audio.ts (12,5): Cannot find name 'foo'."
        );
    }

    #[test]
    fn test_display_without_location() {
        let diag = Diagnostic::new(Severity::Message, "Compilation complete.");
        assert_eq!(diag.to_string(), "Compilation complete.");
    }

    #[test]
    fn test_severity_log_levels() {
        assert_eq!(Severity::Error.log_level(), log::Level::Error);
        assert_eq!(Severity::Warning.log_level(), log::Level::Warn);
        assert_eq!(Severity::Message.log_level(), log::Level::Info);
        assert_eq!(Severity::Suggestion.log_level(), log::Level::Info);
    }
}
