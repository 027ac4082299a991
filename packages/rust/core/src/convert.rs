//! `convert` job: structural YAML-to-JSON copy.

use std::path::PathBuf;

use tracing::{info, instrument};

use yamlkit_schema::to_json_string;
use yamlkit_shared::{AppConfig, Document, Result};

use crate::batch::{FileJob, SourceFile, ensure_dir, read_text, write_text};

/// Converted documents are indented with four spaces.
const OUTPUT_INDENT: usize = 4;

/// Runtime configuration for the `convert` job.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Where `<stem>.json` files are written.
    pub output_dir: PathBuf,
    /// Where failure reports are written.
    pub result_dir: PathBuf,
}

impl From<&AppConfig> for ConvertConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            output_dir: config.directories.output_dir.clone(),
            result_dir: config.directories.result_dir.clone(),
        }
    }
}

pub struct ConvertJob {
    config: ConvertConfig,
}

impl ConvertJob {
    pub fn new(config: ConvertConfig) -> Self {
        Self { config }
    }
}

impl FileJob for ConvertJob {
    fn name(&self) -> &'static str {
        "convert"
    }

    fn prepare(&self) -> Result<()> {
        ensure_dir(&self.config.output_dir)
    }

    fn report_path(&self, file: &SourceFile) -> PathBuf {
        self.config.result_dir.join(file.with_suffix("_errors.txt"))
    }

    #[instrument(skip_all, fields(file = %file.file_name))]
    fn process(&self, file: &SourceFile) -> Result<Vec<PathBuf>> {
        let doc = Document::from_yaml_str(&read_text(&file.path)?)?;

        let out = self.config.output_dir.join(file.with_suffix(".json"));
        write_text(&out, &to_json_string(&doc.to_json(), OUTPUT_INDENT)?)?;
        info!(file = %file.file_name, output = %out.display(), "converted to JSON");

        Ok(vec![out])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{BatchConfig, FileStatus, SilentProgress, run_batch};
    use yamlkit_shared::ErrorKind;

    fn setup() -> (tempfile::TempDir, BatchConfig, ConvertJob) {
        let root = tempfile::tempdir().expect("tempdir");
        let source_dir = root.path().join("yaml");
        std::fs::create_dir_all(&source_dir).unwrap();

        let config = ConvertConfig {
            output_dir: root.path().join("output"),
            result_dir: root.path().join("result"),
        };
        let batch = BatchConfig {
            source_dir,
            source_suffix: ".yaml".into(),
            result_dir: config.result_dir.clone(),
        };
        (root, batch, ConvertJob::new(config))
    }

    #[test]
    fn writes_four_space_json_in_source_order() {
        let (_root, batch, job) = setup();
        std::fs::write(
            batch.source_dir.join("doc.yaml"),
            "zeta: 1\nalpha:\n  - x\n  - true\n",
        )
        .unwrap();

        let report = run_batch(&batch, &job, &SilentProgress).unwrap();
        assert_eq!(report.succeeded(), 1);

        let text = std::fs::read_to_string(job.config.output_dir.join("doc.json")).unwrap();
        assert_eq!(
            text,
            "{\n    \"zeta\": 1,\n    \"alpha\": [\n        \"x\",\n        true\n    ]\n}\n"
        );
    }

    #[test]
    fn scalar_documents_convert_too() {
        let (_root, batch, job) = setup();
        std::fs::write(batch.source_dir.join("s.yaml"), "just text\n").unwrap();

        run_batch(&batch, &job, &SilentProgress).unwrap();
        let text = std::fs::read_to_string(job.config.output_dir.join("s.json")).unwrap();
        assert_eq!(text, "\"just text\"\n");
    }

    #[test]
    fn parse_errors_get_a_report() {
        let (_root, batch, job) = setup();
        std::fs::write(batch.source_dir.join("bad.yaml"), "a: b: c\n").unwrap();

        let report = run_batch(&batch, &job, &SilentProgress).unwrap();
        assert_eq!(
            report.outcomes[0].status,
            FileStatus::Failed {
                kind: ErrorKind::Parse,
                report: job.config.result_dir.join("bad_errors.txt"),
            }
        );
        assert!(!job.config.output_dir.join("bad.json").exists());
    }

    #[test]
    fn non_utf8_file_does_not_stop_the_batch() {
        let (_root, batch, job) = setup();
        std::fs::write(batch.source_dir.join("a.yaml"), [0xff, 0xfe, b'k', b':', b' ', b'v']).unwrap();
        std::fs::write(batch.source_dir.join("b.yaml"), "k: v\n").unwrap();

        let report = run_batch(&batch, &job, &SilentProgress).unwrap();
        assert_eq!(report.failed(), 1);
        assert!(matches!(
            report.outcomes[0].status,
            FileStatus::Failed { kind: ErrorKind::Parse, .. }
        ));
        assert!(job.config.result_dir.join("a_errors.txt").exists());
        assert!(job.config.output_dir.join("b.json").exists());
    }
}
