//! `markdownlint` adapter.
//!
//! markdownlint only takes rule overrides from a file, so each run writes
//! a throwaway JSON config into the system temp dir.

use std::ffi::OsStr;
use std::io::Write;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tempfile::NamedTempFile;
use tracing::{debug, instrument};

use yamlkit_shared::{Result, YamlkitError};

use crate::command::{check_exit, run_tool};
use crate::{Diagnostic, Level, LintOutcome, LintRules, Linter};

/// Runs `markdownlint` with the default rules plus overrides.
#[derive(Debug, Clone)]
pub struct MarkdownLint {
    program: String,
}

impl MarkdownLint {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn config_json(rules: &LintRules) -> serde_json::Value {
        serde_json::json!({
            "default": true,
            "line-length": { "line_length": rules.max_line_length }
        })
    }

    fn write_config(rules: &LintRules) -> Result<NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix("yamlkit-markdownlint-")
            .suffix(".json")
            .tempfile()
            .map_err(|e| YamlkitError::io(std::env::temp_dir(), e))?;

        let body = serde_json::to_string(&Self::config_json(rules))
            .map_err(|e| YamlkitError::Serialization(e.to_string()))?;
        file.write_all(body.as_bytes())
            .map_err(|e| YamlkitError::io(file.path(), e))?;

        Ok(file)
    }
}

impl Default for MarkdownLint {
    fn default() -> Self {
        Self::new("markdownlint")
    }
}

impl Linter for MarkdownLint {
    fn name(&self) -> &str {
        "markdownlint"
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    fn lint(&self, path: &Path, rules: &LintRules) -> Result<LintOutcome> {
        // Lives until the tool has exited.
        let config = Self::write_config(rules)?;

        let args = [
            OsStr::new("-c"),
            config.path().as_os_str(),
            path.as_os_str(),
        ];
        let output = run_tool(&self.program, args)?;

        let passed = check_exit(&self.program, &output)?;
        let diagnostics = parse_output(&output.combined());
        debug!(passed, issues = diagnostics.len(), "markdownlint finished");

        Ok(LintOutcome {
            passed,
            diagnostics,
            output: output.combined(),
        })
    }
}

/// Parse `file:line[:col] [severity] MD000/alias description` lines.
fn parse_output(text: &str) -> Vec<Diagnostic> {
    static LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^.+?:(\d+)(?::(\d+))? (?:(error|warning) )?(MD\d{3}(?:/[\w-]+)*) (.*)$")
            .expect("valid regex")
    });

    text.lines()
        .filter_map(|line| {
            let caps = LINE_RE.captures(line.trim_end())?;
            Some(Diagnostic {
                line: caps[1].parse().ok()?,
                column: caps.get(2).and_then(|m| m.as_str().parse().ok()),
                level: match caps.get(3).map(|m| m.as_str()) {
                    Some("warning") => Level::Warning,
                    _ => Level::Error,
                },
                message: caps[5].to_string(),
                rule: Some(caps[4].to_string()),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_sets_line_length() {
        let rules = LintRules {
            max_line_length: 120,
        };
        let config = MarkdownLint::config_json(&rules);
        assert_eq!(config["line-length"]["line_length"], 120);
        assert_eq!(config["default"], true);
    }

    #[test]
    fn config_file_is_written() {
        let rules = LintRules { max_line_length: 90 };
        let file = MarkdownLint::write_config(&rules).unwrap();
        let text = std::fs::read_to_string(file.path()).unwrap();
        assert!(text.contains("\"line_length\":90"));
        assert!(file.path().extension().is_some_and(|e| e == "json"));
    }

    #[test]
    fn parses_cli_output() {
        let text = "\
md/a.md:3 MD022/blanks-around-headings Headings should be surrounded by blank lines [Expected: 1; Actual: 0; Below]
md/a.md:10:121 MD013/line-length Line length [Expected: 120; Actual: 140]
md/a.md:1 error MD041/first-line-heading/first-line-h1 First line in a file should be a top-level heading
";
        let diags = parse_output(text);
        assert_eq!(diags.len(), 3);

        assert_eq!(diags[0].line, 3);
        assert_eq!(diags[0].column, None);
        assert_eq!(diags[0].rule.as_deref(), Some("MD022/blanks-around-headings"));

        assert_eq!(diags[1].column, Some(121));
        assert_eq!(diags[1].to_string(), "10:121 Line length [Expected: 120; Actual: 140]");

        assert_eq!(
            diags[2].rule.as_deref(),
            Some("MD041/first-line-heading/first-line-h1")
        );
        assert_eq!(diags[2].level, Level::Error);
    }
}
