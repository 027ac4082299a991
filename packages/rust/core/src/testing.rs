//! In-process linter fake for job tests.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use yamlkit_lint::{Diagnostic, Level, LintOutcome, LintRules, Linter};
use yamlkit_shared::{Result, YamlkitError};

enum Behavior {
    Pass,
    Fail(LintOutcome),
    Broken(String),
}

/// Returns a canned outcome and records every path it was asked to lint.
pub(crate) struct FakeLinter {
    behavior: Behavior,
    pub calls: Mutex<Vec<(PathBuf, LintRules)>>,
}

impl FakeLinter {
    fn with(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn passing() -> Self {
        Self::with(Behavior::Pass)
    }

    /// Fails with one error per `(line, column, message)`.
    pub fn failing_at(issues: &[(u32, u32, &str)]) -> Self {
        let diagnostics: Vec<Diagnostic> = issues
            .iter()
            .map(|(line, column, message)| Diagnostic {
                line: *line,
                column: Some(*column),
                level: Level::Error,
                message: (*message).to_string(),
                rule: None,
            })
            .collect();
        let output = diagnostics
            .iter()
            .map(|d| format!("file:{d}\n"))
            .collect();

        Self::with(Behavior::Fail(LintOutcome {
            passed: false,
            diagnostics,
            output,
        }))
    }

    /// Fails with raw tool output and no parsed diagnostics.
    pub fn failing_with_output(output: &str) -> Self {
        Self::with(Behavior::Fail(LintOutcome {
            passed: false,
            diagnostics: Vec::new(),
            output: output.to_string(),
        }))
    }

    /// The tool itself cannot run.
    pub fn broken(output: &str) -> Self {
        Self::with(Behavior::Broken(output.to_string()))
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Linter for FakeLinter {
    fn name(&self) -> &str {
        "fake"
    }

    fn lint(&self, path: &Path, rules: &LintRules) -> Result<LintOutcome> {
        self.calls.lock().unwrap().push((path.to_path_buf(), *rules));
        match &self.behavior {
            Behavior::Pass => Ok(LintOutcome::clean()),
            Behavior::Fail(outcome) => Ok(outcome.clone()),
            Behavior::Broken(output) => Err(YamlkitError::external_tool("fake", output.clone())),
        }
    }
}
