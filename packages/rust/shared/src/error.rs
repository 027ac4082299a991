//! Error types for yamlkit.
//!
//! Library crates use [`YamlkitError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::fmt;
use std::path::PathBuf;

/// Top-level error type for all yamlkit operations.
#[derive(Debug, thiserror::Error)]
pub enum YamlkitError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Malformed YAML or JSON input.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Validation was requested but no schema file exists for the document.
    #[error("schema not found for {file_name} (expected {schema_path:?})")]
    SchemaMissing {
        file_name: String,
        schema_path: PathBuf,
    },

    /// An external linter reported style issues. The message is the full report.
    #[error("lint failed: {message}")]
    Lint { message: String },

    /// An external tool could not be run or exited unexpectedly.
    #[error("{tool} failed: {output}")]
    ExternalTool { tool: String, output: String },

    /// Document shape or schema problems (non-mapping root, uncompilable schema).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON or TOML serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, YamlkitError>;

/// Reportable category of a [`YamlkitError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Config,
    Parse,
    SchemaMissing,
    Lint,
    ExternalTool,
    Validation,
    Io,
    Serialization,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Parse => "parse",
            Self::SchemaMissing => "schema-missing",
            Self::Lint => "lint",
            Self::ExternalTool => "external-tool",
            Self::Validation => "validation",
            Self::Io => "io",
            Self::Serialization => "serialization",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl YamlkitError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a lint error carrying the full report text.
    pub fn lint(msg: impl Into<String>) -> Self {
        Self::Lint {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create an external tool error with the tool's verbatim output.
    pub fn external_tool(tool: impl Into<String>, output: impl Into<String>) -> Self {
        Self::ExternalTool {
            tool: tool.into(),
            output: output.into(),
        }
    }

    pub fn schema_missing(file_name: impl Into<String>, schema_path: impl Into<PathBuf>) -> Self {
        Self::SchemaMissing {
            file_name: file_name.into(),
            schema_path: schema_path.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config { .. } => ErrorKind::Config,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::SchemaMissing { .. } => ErrorKind::SchemaMissing,
            Self::Lint { .. } => ErrorKind::Lint,
            Self::ExternalTool { .. } => ErrorKind::ExternalTool,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Io { .. } => ErrorKind::Io,
            Self::Serialization(_) => ErrorKind::Serialization,
        }
    }

    /// Whether this error concerns a single input file rather than the whole run.
    ///
    /// File-scoped errors are recorded in that file's result artifact and the
    /// batch moves on; everything else aborts the run.
    pub fn is_file_scoped(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Parse
                | ErrorKind::SchemaMissing
                | ErrorKind::Lint
                | ErrorKind::ExternalTool
                | ErrorKind::Validation
        )
    }

    /// Text written into a result artifact for this error.
    pub fn report_text(&self) -> String {
        match self {
            Self::Lint { message } => message.clone(),
            Self::ExternalTool { output, .. } => output.clone(),
            other => other.to_string(),
        }
    }
}
