//! Semantic checks on a loaded configuration.
//!
//! Parsing already rejects malformed files; this catches values that parse
//! but would make discovery or mod execution misbehave.

use std::path::PathBuf;

use crate::schema::ModhostConfig;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Dotted path, e.g. "mods.entry_extension"
    pub path: &'static str,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.path, self.message)
    }
}

/// Result of validating a configuration.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
    pub config_path: Option<PathBuf>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Count diagnostics by severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    fn push(&mut self, severity: Severity, path: &'static str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            severity,
            path,
            message: message.into(),
        });
    }
}

/// Validate a configuration.
#[must_use]
pub fn validate(config: &ModhostConfig) -> ValidationResult {
    let mut result = ValidationResult::default();
    let mods = &config.mods;

    let ext = mods.entry_extension.as_str();
    if ext.is_empty() {
        result.push(Severity::Error, "mods.entry_extension", "must not be empty");
    } else if ext.contains(['.', '/', '\\']) {
        result.push(
            Severity::Error,
            "mods.entry_extension",
            format!("\"{ext}\" must be a bare extension without dots or separators"),
        );
    }

    if mods.sideload_flag.trim().is_empty() {
        result.push(Severity::Error, "mods.sideload_flag", "must not be empty");
    }

    if config.host.name.is_empty() {
        result.push(Severity::Error, "host.name", "must not be empty");
    } else if config.host.name.starts_with("mods.") {
        result.push(
            Severity::Warning,
            "host.name",
            "names under \"mods.\" shadow mod module paths",
        );
    }

    if !ext.is_empty() && mods.entry_interpreter().is_none() {
        result.push(
            Severity::Warning,
            "mods.interpreters",
            format!("no interpreter configured for .{ext} entry files"),
        );
    }

    result
}
