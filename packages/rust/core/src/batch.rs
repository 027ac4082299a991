//! Batch driver: enumerate a source directory and run one job per file.
//!
//! Files are independent. A file-scoped error (bad YAML, lint issues, missing
//! schema, tool failure) is written to that file's report and the batch moves
//! on. Anything else, like an unreadable source directory, aborts the run.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use yamlkit_shared::{AppConfig, ErrorKind, Result, YamlkitError};

/// Where to find source files.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Directory whose entries are processed.
    pub source_dir: PathBuf,
    /// Only file names ending with this suffix are picked up.
    pub source_suffix: String,
    /// Directory for per-file reports.
    pub result_dir: PathBuf,
}

impl BatchConfig {
    /// Batch over `source_dir` with the configured suffix and result dir.
    pub fn from_app(config: &AppConfig, source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            source_suffix: config.batch.source_suffix.clone(),
            result_dir: config.directories.result_dir.clone(),
        }
    }
}

/// One input file selected for processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Full path to the file.
    pub path: PathBuf,
    /// File name, e.g. `service.yaml`.
    pub file_name: String,
    /// File name with the source suffix removed, e.g. `service`.
    pub stem: String,
}

impl SourceFile {
    /// Output file name built from the stem, e.g. `with_suffix(".json")`.
    pub fn with_suffix(&self, suffix: &str) -> String {
        format!("{}{suffix}", self.stem)
    }
}

/// A per-file transformation run by [`run_batch`].
pub trait FileJob {
    /// Short name used in logs and the batch report.
    fn name(&self) -> &'static str;

    /// Create output directories. Called once before any file is processed.
    fn prepare(&self) -> Result<()>;

    /// Where the failure report for `file` is written.
    fn report_path(&self, file: &SourceFile) -> PathBuf;

    /// Process one file, returning the artifacts written.
    fn process(&self, file: &SourceFile) -> Result<Vec<PathBuf>>;

    /// Text of the failure report for a file-scoped error.
    fn failure_report(&self, _file: &SourceFile, err: &YamlkitError) -> String {
        err.report_text()
    }
}

/// Final state of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// Processed; these artifacts were written.
    Done { artifacts: Vec<PathBuf> },
    /// A file-scoped error was recorded in `report`.
    Failed { kind: ErrorKind, report: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub file_name: String,
    pub status: FileStatus,
}

/// Per-file outcomes of one batch run, in processing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub job: &'static str,
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, FileStatus::Done { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// Number of files written, failure reports included.
    pub fn artifact_count(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match &o.status {
                FileStatus::Done { artifacts } => artifacts.len(),
                FileStatus::Failed { .. } => 1,
            })
            .sum()
    }
}

/// Progress callback for reporting batch status.
pub trait ProgressReporter: Send + Sync {
    /// Called before a file is processed. `current` is 1-based.
    fn file_started(&self, file_name: &str, current: usize, total: usize);
    /// Called after a file reached its final state.
    fn file_finished(&self, outcome: &FileOutcome);
    /// Called when the batch completes.
    fn done(&self, report: &BatchReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn file_started(&self, _file_name: &str, _current: usize, _total: usize) {}
    fn file_finished(&self, _outcome: &FileOutcome) {}
    fn done(&self, _report: &BatchReport) {}
}

/// Run `job` over every matching file in `config.source_dir`.
#[instrument(skip_all, fields(job = job.name(), source = %config.source_dir.display()))]
pub fn run_batch(
    config: &BatchConfig,
    job: &dyn FileJob,
    progress: &dyn ProgressReporter,
) -> Result<BatchReport> {
    ensure_dir(&config.result_dir)?;
    job.prepare()?;

    let files = list_sources(&config.source_dir, &config.source_suffix)?;
    let total = files.len();
    info!(total, "starting batch");

    let mut outcomes = Vec::with_capacity(total);

    for (i, file) in files.iter().enumerate() {
        progress.file_started(&file.file_name, i + 1, total);

        let status = match job.process(file) {
            Ok(artifacts) => {
                info!(file = %file.file_name, artifacts = artifacts.len(), "processed");
                FileStatus::Done { artifacts }
            }
            Err(err) if err.is_file_scoped() => {
                let report = job.report_path(file);
                write_text(&report, &job.failure_report(file, &err))?;
                warn!(
                    file = %file.file_name,
                    kind = %err.kind(),
                    report = %report.display(),
                    error = %err,
                    "failed"
                );
                FileStatus::Failed {
                    kind: err.kind(),
                    report,
                }
            }
            Err(err) => return Err(err),
        };

        let outcome = FileOutcome {
            file_name: file.file_name.clone(),
            status,
        };
        progress.file_finished(&outcome);
        outcomes.push(outcome);
    }

    let report = BatchReport {
        job: job.name(),
        outcomes,
    };

    info!(
        total = report.total(),
        failed = report.failed(),
        artifacts = report.artifact_count(),
        "batch complete"
    );
    progress.done(&report);

    Ok(report)
}

/// Regular files in `dir` whose names end with `suffix`, sorted by name.
pub fn list_sources(dir: &Path, suffix: &str) -> Result<Vec<SourceFile>> {
    let entries = std::fs::read_dir(dir).map_err(|e| YamlkitError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| YamlkitError::io(dir, e))?;
        let path = entry.path();

        let Some(file_name) = entry.file_name().to_str().map(String::from) else {
            debug!(path = %path.display(), "skipping non-UTF-8 file name");
            continue;
        };
        let Some(stem) = file_name.strip_suffix(suffix).map(String::from) else {
            continue;
        };
        if !path.is_file() {
            continue;
        }

        files.push(SourceFile {
            path,
            file_name,
            stem,
        });
    }

    files.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    debug!(count = files.len(), "source files listed");
    Ok(files)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a directory (and parents) if it does not exist.
pub(crate) fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| YamlkitError::io(dir, e))
}

/// Read an input file as UTF-8 text.
///
/// An unreadable or non-UTF-8 input is a `Parse` error so it only fails the
/// file being processed.
pub(crate) fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| YamlkitError::parse(format!("{}: {e}", path.display())))
}

/// Write a text artifact, replacing any previous run's output.
pub(crate) fn write_text(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).map_err(|e| YamlkitError::io(path, e))?;
    debug!(path = %path.display(), bytes = content.len(), "wrote artifact");
    Ok(())
}
