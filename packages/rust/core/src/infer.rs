//! `infer` job: lint a sample template, then write its inferred JSON schema.

use std::path::PathBuf;

use tracing::{info, instrument, warn};

use yamlkit_lint::{LintOutcome, LintRules, Linter};
use yamlkit_schema::{infer_schema, to_json_string};
use yamlkit_shared::{AppConfig, Document, Result, YamlkitError};

use crate::batch::{FileJob, SourceFile, ensure_dir, read_text, write_text};

/// Schema files are indented with two spaces.
const SCHEMA_INDENT: usize = 2;

/// Runtime configuration for the `infer` job.
#[derive(Debug, Clone)]
pub struct InferConfig {
    /// Where `<stem>.json` schemas are written.
    pub schema_dir: PathBuf,
    /// Where lint and failure reports are written.
    pub result_dir: PathBuf,
    /// Rules for the pre-inference YAML lint.
    pub lint_rules: LintRules,
}

impl From<&AppConfig> for InferConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            schema_dir: config.directories.schema_dir.clone(),
            result_dir: config.directories.result_dir.clone(),
            lint_rules: LintRules {
                max_line_length: config.lint.schema_yaml_line_length,
            },
        }
    }
}

/// Lints each template and infers a schema from it.
///
/// Lint findings are advisory here: they are written to
/// `<stem>_errors_lint.txt` and the schema is still generated.
pub struct InferJob {
    config: InferConfig,
    linter: Box<dyn Linter>,
}

impl InferJob {
    pub fn new(config: InferConfig, linter: Box<dyn Linter>) -> Self {
        Self { config, linter }
    }

    /// Run the linter and write its findings, if any. Returns the report path when written.
    fn lint(&self, file: &SourceFile) -> Result<Option<PathBuf>> {
        let report = self
            .config
            .result_dir
            .join(file.with_suffix("_errors_lint.txt"));

        let text = match self.linter.lint(&file.path, &self.config.lint_rules) {
            Ok(outcome) if outcome.passed && outcome.diagnostics.is_empty() => {
                info!(file = %file.file_name, "no lint errors found");
                return Ok(None);
            }
            Ok(outcome) => lint_report(&outcome),
            Err(err) if err.is_file_scoped() => {
                warn!(file = %file.file_name, linter = self.linter.name(), error = %err, "linter failed");
                err.report_text()
            }
            Err(err) => return Err(err),
        };

        write_text(&report, &text)?;
        info!(file = %file.file_name, report = %report.display(), "lint errors found");
        Ok(Some(report))
    }
}

/// One `line:column message` line per diagnostic, or the raw output if none were parsed.
fn lint_report(outcome: &LintOutcome) -> String {
    if outcome.diagnostics.is_empty() {
        return outcome.output.clone();
    }

    outcome
        .diagnostics
        .iter()
        .map(|d| format!("{d}\n"))
        .collect()
}

impl FileJob for InferJob {
    fn name(&self) -> &'static str {
        "infer"
    }

    fn prepare(&self) -> Result<()> {
        ensure_dir(&self.config.schema_dir)?;
        ensure_dir(&self.config.result_dir)
    }

    fn report_path(&self, file: &SourceFile) -> PathBuf {
        self.config.result_dir.join(file.with_suffix("_errors.txt"))
    }

    #[instrument(skip_all, fields(file = %file.file_name))]
    fn process(&self, file: &SourceFile) -> Result<Vec<PathBuf>> {
        let mut artifacts = Vec::new();
        artifacts.extend(self.lint(file)?);

        let doc = Document::from_yaml_str(&read_text(&file.path)?)?;
        let root = doc.as_mapping().ok_or_else(|| {
            YamlkitError::validation(format!("root of {} is not a mapping", file.file_name))
        })?;

        let schema = infer_schema(root);
        let schema_path = self.config.schema_dir.join(file.with_suffix(".json"));
        write_text(&schema_path, &to_json_string(&schema, SCHEMA_INDENT)?)?;
        info!(file = %file.file_name, schema = %schema_path.display(), "generated JSON schema");

        artifacts.push(schema_path);
        Ok(artifacts)
    }
}
