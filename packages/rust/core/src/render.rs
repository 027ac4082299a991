//! `render` job: lint YAML, render it to Markdown, then lint the Markdown.

use std::path::PathBuf;

use tracing::{info, instrument};

use yamlkit_lint::{LintRules, Linter};
use yamlkit_markdown::render_markdown;
use yamlkit_shared::{AppConfig, Document, Result, YamlkitError};

use crate::batch::{FileJob, SourceFile, ensure_dir, read_text, write_text};

const YAML_LINT_HEADER: &str = "YAML Lint Errors:";
const MARKDOWN_LINT_HEADER: &str = "Markdown Lint Errors:";
const MARKDOWN_LINT_PASSED: &str = "Markdown Lint Passed\n";

/// Runtime configuration for the `render` job.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Where `<stem>.md` files are written.
    pub markdown_dir: PathBuf,
    /// Where `<stem>_result.txt` reports are written.
    pub result_dir: PathBuf,
    pub yaml_rules: LintRules,
    pub markdown_rules: LintRules,
}

impl From<&AppConfig> for RenderConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            markdown_dir: config.directories.markdown_dir.clone(),
            result_dir: config.directories.result_dir.clone(),
            yaml_rules: LintRules {
                max_line_length: config.lint.yaml_line_length,
            },
            markdown_rules: LintRules {
                max_line_length: config.lint.markdown_line_length,
            },
        }
    }
}

/// Renders each YAML document to Markdown.
///
/// A document that fails YAML lint is not rendered. Every file ends with a
/// `<stem>_result.txt` holding either the pass marker or the lint output.
pub struct RenderJob {
    config: RenderConfig,
    yaml_linter: Box<dyn Linter>,
    markdown_linter: Box<dyn Linter>,
}

impl RenderJob {
    pub fn new(
        config: RenderConfig,
        yaml_linter: Box<dyn Linter>,
        markdown_linter: Box<dyn Linter>,
    ) -> Self {
        Self {
            config,
            yaml_linter,
            markdown_linter,
        }
    }
}

impl FileJob for RenderJob {
    fn name(&self) -> &'static str {
        "render"
    }

    fn prepare(&self) -> Result<()> {
        ensure_dir(&self.config.markdown_dir)?;
        ensure_dir(&self.config.result_dir)
    }

    fn report_path(&self, file: &SourceFile) -> PathBuf {
        self.config.result_dir.join(file.with_suffix("_result.txt"))
    }

    #[instrument(skip_all, fields(file = %file.file_name))]
    fn process(&self, file: &SourceFile) -> Result<Vec<PathBuf>> {
        let doc = Document::from_yaml_str(&read_text(&file.path)?)?;

        let yaml_lint = self.yaml_linter.lint(&file.path, &self.config.yaml_rules)?;
        if !yaml_lint.passed {
            return Err(YamlkitError::lint(format!(
                "{YAML_LINT_HEADER}\n{}",
                yaml_lint.output
            )));
        }

        let md_path = self.config.markdown_dir.join(file.with_suffix(".md"));
        write_text(&md_path, &render_markdown(&doc))?;
        info!(file = %file.file_name, markdown = %md_path.display(), "rendered markdown");

        let md_lint = self
            .markdown_linter
            .lint(&md_path, &self.config.markdown_rules)?;
        if !md_lint.passed {
            return Err(YamlkitError::lint(format!(
                "{MARKDOWN_LINT_HEADER}\n{}",
                md_lint.output
            )));
        }

        let result = self.report_path(file);
        write_text(&result, MARKDOWN_LINT_PASSED)?;

        Ok(vec![md_path, result])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{BatchConfig, FileStatus, SilentProgress, run_batch};
    use crate::testing::FakeLinter;
    use std::sync::Arc;
    use yamlkit_shared::ErrorKind;

    struct Fixture {
        _root: tempfile::TempDir,
        batch: BatchConfig,
        config: RenderConfig,
    }

    fn fixture() -> Fixture {
        let root = tempfile::tempdir().expect("tempdir");
        let source_dir = root.path().join("yaml");
        std::fs::create_dir_all(&source_dir).unwrap();

        let config = RenderConfig {
            markdown_dir: root.path().join("md"),
            result_dir: root.path().join("result"),
            yaml_rules: LintRules {
                max_line_length: 120,
            },
            markdown_rules: LintRules { max_line_length: 80 },
        };
        let batch = BatchConfig {
            source_dir,
            source_suffix: ".yaml".into(),
            result_dir: config.result_dir.clone(),
        };
        Fixture {
            _root: root,
            batch,
            config,
        }
    }

    fn job(fx: &Fixture, yaml: FakeLinter, md: FakeLinter) -> RenderJob {
        RenderJob::new(fx.config.clone(), Box::new(yaml), Box::new(md))
    }

    fn read(path: PathBuf) -> String {
        std::fs::read_to_string(path).expect("read artifact")
    }

    #[test]
    fn passing_file_writes_markdown_and_pass_marker() {
        let fx = fixture();
        std::fs::write(
            fx.batch.source_dir.join("page.yaml"),
            "title: Hello\ntags: [x, y]\n",
        )
        .unwrap();

        let job = job(&fx, FakeLinter::passing(), FakeLinter::passing());
        let report = run_batch(&fx.batch, &job, &SilentProgress).unwrap();
        assert_eq!(report.succeeded(), 1);

        assert_eq!(
            read(fx.config.markdown_dir.join("page.md")),
            "## title\n\nHello\n\n## tags\n\n- x\n\n- y\n\n"
        );
        assert_eq!(read(fx.config.result_dir.join("page_result.txt")), "Markdown Lint Passed\n");
    }

    #[test]
    fn linters_receive_configured_rules() {
        let fx = fixture();
        std::fs::write(fx.batch.source_dir.join("a.yaml"), "k: v\n").unwrap();

        let yaml = Arc::new(FakeLinter::passing());
        let md = Arc::new(FakeLinter::passing());
        let job = RenderJob::new(
            fx.config.clone(),
            Box::new(Arc::clone(&yaml)),
            Box::new(Arc::clone(&md)),
        );
        run_batch(&fx.batch, &job, &SilentProgress).unwrap();

        let yaml_calls = yaml.calls.lock().unwrap();
        assert_eq!(yaml_calls.len(), 1);
        assert_eq!(yaml_calls[0].0, fx.batch.source_dir.join("a.yaml"));
        assert_eq!(yaml_calls[0].1.max_line_length, 120);

        let md_calls = md.calls.lock().unwrap();
        assert_eq!(md_calls[0].0, fx.config.markdown_dir.join("a.md"));
        assert_eq!(md_calls[0].1.max_line_length, 80);
    }

    #[test]
    fn markdown_is_not_linted_after_yaml_failure() {
        let fx = fixture();
        std::fs::write(fx.batch.source_dir.join("a.yaml"), "k: v\n").unwrap();

        let md = Arc::new(FakeLinter::passing());
        let job = RenderJob::new(
            fx.config.clone(),
            Box::new(FakeLinter::failing_at(&[(1, 1, "too many spaces")])),
            Box::new(Arc::clone(&md)),
        );
        run_batch(&fx.batch, &job, &SilentProgress).unwrap();

        assert_eq!(md.call_count(), 0);
    }

    #[test]
    fn yaml_lint_failure_skips_rendering() {
        let fx = fixture();
        std::fs::write(fx.batch.source_dir.join("a.yaml"), "k: v   \n").unwrap();

        let output = "yaml/a.yaml:1:5: [error] trailing spaces (trailing-spaces)\n";
        let job = job(
            &fx,
            FakeLinter::failing_with_output(output),
            FakeLinter::passing(),
        );
        let report = run_batch(&fx.batch, &job, &SilentProgress).unwrap();

        assert!(matches!(
            report.outcomes[0].status,
            FileStatus::Failed { kind: ErrorKind::Lint, .. }
        ));
        assert_eq!(
            read(fx.config.result_dir.join("a_result.txt")),
            format!("YAML Lint Errors:\n{output}")
        );
        assert!(!fx.config.markdown_dir.join("a.md").exists());
    }

    #[test]
    fn markdown_lint_failure_keeps_markdown() {
        let fx = fixture();
        std::fs::write(fx.batch.source_dir.join("a.yaml"), "k: v\n").unwrap();

        let output = "md/a.md:1 MD041/first-line-heading First line in a file should be a top-level heading\n";
        let job = job(
            &fx,
            FakeLinter::passing(),
            FakeLinter::failing_with_output(output),
        );
        let report = run_batch(&fx.batch, &job, &SilentProgress).unwrap();

        assert_eq!(report.failed(), 1);
        assert!(fx.config.markdown_dir.join("a.md").exists());
        assert_eq!(
            read(fx.config.result_dir.join("a_result.txt")),
            format!("Markdown Lint Errors:\n{output}")
        );
    }

    #[test]
    fn parse_error_is_reported_before_linting() {
        let fx = fixture();
        std::fs::write(fx.batch.source_dir.join("a.yaml"), "k: [\n").unwrap();

        let job = job(&fx, FakeLinter::passing(), FakeLinter::passing());
        let report = run_batch(&fx.batch, &job, &SilentProgress).unwrap();

        assert!(matches!(
            report.outcomes[0].status,
            FileStatus::Failed { kind: ErrorKind::Parse, .. }
        ));
        assert!(read(fx.config.result_dir.join("a_result.txt")).starts_with("parse error"));
    }

    #[test]
    fn broken_linter_output_is_surfaced_verbatim() {
        let fx = fixture();
        std::fs::write(fx.batch.source_dir.join("a.yaml"), "k: v\n").unwrap();
        std::fs::write(fx.batch.source_dir.join("b.yaml"), "k: v\n").unwrap();

        let job = job(
            &fx,
            FakeLinter::passing(),
            FakeLinter::broken("markdownlint: not found"),
        );
        let report = run_batch(&fx.batch, &job, &SilentProgress).unwrap();

        assert_eq!(report.failed(), 2);
        assert_eq!(
            read(fx.config.result_dir.join("b_result.txt")),
            "markdownlint: not found"
        );
    }
}
