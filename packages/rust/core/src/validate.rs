//! `validate` job: check each YAML document against its inferred schema.

use std::path::PathBuf;

use tracing::{info, instrument};

use yamlkit_schema::validate_document;
use yamlkit_shared::{AppConfig, Document, Result, YamlkitError};

use crate::batch::{FileJob, SourceFile, ensure_dir, read_text, write_text};

/// Runtime configuration for the `validate` job.
#[derive(Debug, Clone)]
pub struct ValidateConfig {
    /// Where `<stem>.json` schemas are looked up.
    pub schema_dir: PathBuf,
    /// Where `<stem>_result.txt` reports are written.
    pub result_dir: PathBuf,
}

impl From<&AppConfig> for ValidateConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            schema_dir: config.directories.schema_dir.clone(),
            result_dir: config.directories.result_dir.clone(),
        }
    }
}

/// Validates each document against the schema with the same stem.
///
/// An invalid document is still a successful run for that file: the
/// violations are the report.
pub struct ValidateJob {
    config: ValidateConfig,
}

impl ValidateJob {
    pub fn new(config: ValidateConfig) -> Self {
        Self { config }
    }

    fn schema_path(&self, file: &SourceFile) -> PathBuf {
        self.config.schema_dir.join(file.with_suffix(".json"))
    }

    fn load_schema(&self, file: &SourceFile) -> Result<serde_json::Value> {
        let path = self.schema_path(file);
        if !path.is_file() {
            return Err(YamlkitError::schema_missing(&file.file_name, path));
        }

        let text = read_text(&path)?;
        serde_json::from_str(&text)
            .map_err(|e| YamlkitError::parse(format!("{}: {e}", path.display())))
    }
}

impl FileJob for ValidateJob {
    fn name(&self) -> &'static str {
        "validate"
    }

    fn prepare(&self) -> Result<()> {
        ensure_dir(&self.config.result_dir)
    }

    fn report_path(&self, file: &SourceFile) -> PathBuf {
        self.config.result_dir.join(file.with_suffix("_result.txt"))
    }

    #[instrument(skip_all, fields(file = %file.file_name))]
    fn process(&self, file: &SourceFile) -> Result<Vec<PathBuf>> {
        let schema = self.load_schema(file)?;
        let doc = Document::from_yaml_str(&read_text(&file.path)?)?;

        let report = validate_document(&doc.to_json(), &schema)?;
        let out = self.report_path(file);
        write_text(&out, &report.render())?;
        info!(
            file = %file.file_name,
            valid = report.is_valid(),
            violations = report.violations.len(),
            "validated"
        );

        Ok(vec![out])
    }

    fn failure_report(&self, file: &SourceFile, err: &YamlkitError) -> String {
        match err {
            YamlkitError::SchemaMissing { .. } => {
                format!("Esquema JSON no encontrado para {}", file.file_name)
            }
            other => other.report_text(),
        }
    }
}
