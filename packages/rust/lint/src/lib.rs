//! Style linting through external tools.
//!
//! The [`Linter`] trait is the seam: the batch jobs only see diagnostics, so
//! tests can substitute a fake for the real `yamllint` / `markdownlint`
//! processes. Each adapter passes its rule overrides on the command line and
//! parses the tool's line-oriented output.

mod command;
mod markdownlint;
mod yamllint;

use std::fmt;
use std::path::Path;

use yamlkit_shared::Result;

pub use markdownlint::MarkdownLint;
pub use yamllint::YamlLint;

/// Rule overrides applied on top of a linter's defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LintRules {
    /// Maximum allowed line length.
    pub max_line_length: u32,
}

/// Severity reported by the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
}

/// A single issue reported by a linter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: u32,
    /// Some tools omit the column for line-wide issues.
    pub column: Option<u32>,
    pub level: Level,
    pub message: String,
    /// Rule identifier, e.g. `line-length` or `MD022/blanks-around-headings`.
    pub rule: Option<String>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.column {
            Some(col) => write!(f, "{}:{} {}", self.line, col, self.message),
            None => write!(f, "{} {}", self.line, self.message),
        }
    }
}

/// Result of linting one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintOutcome {
    /// The tool exited cleanly.
    pub passed: bool,
    /// Parsed issues, including warnings on a passing run.
    pub diagnostics: Vec<Diagnostic>,
    /// Verbatim tool output (stdout, then stderr).
    pub output: String,
}

impl LintOutcome {
    pub fn clean() -> Self {
        Self {
            passed: true,
            ..Self::default()
        }
    }
}

/// A style checker for files on disk.
pub trait Linter: Send + Sync {
    /// Tool name used in logs and error messages.
    fn name(&self) -> &str;

    /// Lint the file at `path` with `rules`.
    ///
    /// Reported issues are `Ok` with `passed == false`. A tool that cannot be
    /// started or exits unexpectedly is an `ExternalTool` error.
    fn lint(&self, path: &Path, rules: &LintRules) -> Result<LintOutcome>;
}

impl<L: Linter + ?Sized> Linter for std::sync::Arc<L> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn lint(&self, path: &Path, rules: &LintRules) -> Result<LintOutcome> {
        (**self).lint(path, rules)
    }
}
