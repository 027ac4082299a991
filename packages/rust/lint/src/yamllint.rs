//! `yamllint` adapter.

use std::ffi::OsStr;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use yamlkit_shared::Result;

use crate::command::{check_exit, run_tool};
use crate::{Diagnostic, Level, LintOutcome, LintRules, Linter};

/// Runs `yamllint` in parsable mode with the default ruleset plus overrides.
#[derive(Debug, Clone)]
pub struct YamlLint {
    program: String,
}

impl YamlLint {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Inline ruleset passed with `-d`.
    fn ruleset(rules: &LintRules) -> String {
        format!(
            "{{extends: default, rules: {{line-length: {{max: {}}}}}}}",
            rules.max_line_length
        )
    }
}

impl Default for YamlLint {
    fn default() -> Self {
        Self::new("yamllint")
    }
}

impl Linter for YamlLint {
    fn name(&self) -> &str {
        "yamllint"
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    fn lint(&self, path: &Path, rules: &LintRules) -> Result<LintOutcome> {
        let ruleset = Self::ruleset(rules);
        let args = [
            OsStr::new("-f"),
            OsStr::new("parsable"),
            OsStr::new("-d"),
            OsStr::new(&ruleset),
            path.as_os_str(),
        ];
        let output = run_tool(&self.program, args)?;

        let passed = check_exit(&self.program, &output)?;
        let diagnostics = parse_output(&output.stdout);
        debug!(passed, issues = diagnostics.len(), "yamllint finished");

        Ok(LintOutcome {
            passed,
            diagnostics,
            output: output.combined(),
        })
    }
}

/// Parse `file:line:col: [level] message (rule)` lines. Other lines are ignored.
fn parse_output(stdout: &str) -> Vec<Diagnostic> {
    static LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(
            r"^.+?:(\d+):(\d+): \[(error|warning)\] (.*?)(?: \(([a-z0-9-]+)\))?$",
        )
        .expect("valid regex")
    });

    stdout
        .lines()
        .filter_map(|line| {
            let caps = LINE_RE.captures(line.trim_end())?;
            Some(Diagnostic {
                line: caps[1].parse().ok()?,
                column: caps[2].parse().ok(),
                level: if &caps[3] == "error" {
                    Level::Error
                } else {
                    Level::Warning
                },
                message: caps[4].to_string(),
                rule: caps.get(5).map(|m| m.as_str().to_string()),
            })
        })
        .collect()
}
