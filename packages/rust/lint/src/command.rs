//! Blocking subprocess helper shared by the linter adapters.

use std::ffi::OsStr;
use std::process::Command;

use tracing::debug;

use yamlkit_shared::{Result, YamlkitError};

/// Captured result of one tool invocation.
#[derive(Debug)]
pub(crate) struct ToolOutput {
    /// Exit code, `None` when killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    /// Stdout followed by stderr.
    pub fn combined(&self) -> String {
        let mut out = self.stdout.clone();
        if !self.stderr.is_empty() {
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&self.stderr);
        }
        out
    }
}

/// Run `program` with `args` to completion and capture its output.
pub(crate) fn run_tool<I, S>(program: &str, args: I) -> Result<ToolOutput>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new(program).args(args).output().map_err(|e| {
        YamlkitError::external_tool(
            program,
            format!("failed to run `{program}`: {e}. Is it installed and on PATH?"),
        )
    })?;

    let result = ToolOutput {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    debug!(program, code = ?result.code, "tool finished");
    Ok(result)
}

/// Interpret the conventional linter exit codes: 0 clean, 1 issues found.
pub(crate) fn check_exit(program: &str, output: &ToolOutput) -> Result<bool> {
    match output.code {
        Some(0) => Ok(true),
        Some(1) => Ok(false),
        _ => Err(YamlkitError::external_tool(program, output.combined())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(code: Option<i32>, stdout: &str, stderr: &str) -> ToolOutput {
        ToolOutput {
            code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    #[test]
    fn combined_joins_streams() {
        assert_eq!(output(Some(1), "a", "b").combined(), "a\nb");
        assert_eq!(output(Some(1), "a\n", "b\n").combined(), "a\nb\n");
        assert_eq!(output(Some(1), "", "b").combined(), "b");
    }

    #[test]
    fn exit_codes() {
        assert!(check_exit("t", &output(Some(0), "", "")).unwrap());
        assert!(!check_exit("t", &output(Some(1), "", "")).unwrap());

        let err = check_exit("t", &output(Some(2), "", "bad config")).unwrap_err();
        assert_eq!(err.report_text(), "bad config");
        assert!(check_exit("t", &output(None, "", "")).is_err());
    }

    #[test]
    fn missing_program_is_external_tool_error() {
        let err = run_tool("yamlkit-definitely-not-a-real-tool", ["--version"]).unwrap_err();
        assert_eq!(err.kind(), yamlkit_shared::ErrorKind::ExternalTool);
        assert!(err.report_text().contains("failed to run"));
    }
}
