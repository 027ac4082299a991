//! Application configuration for yamlkit.
//!
//! Config lives in `yamlkit.toml` in the working directory unless a path is
//! given explicitly. CLI flags override config file values, which override
//! defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, YamlkitError};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "yamlkit.toml";

// ---------------------------------------------------------------------------
// Config structs (matching yamlkit.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Input and output directories.
    #[serde(default)]
    pub directories: DirectoriesConfig,

    /// Source file selection.
    #[serde(default)]
    pub batch: BatchSettings,

    /// External linter commands and rule overrides.
    #[serde(default)]
    pub lint: LintConfig,
}

/// `[directories]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoriesConfig {
    /// Sample YAML templates used for schema inference.
    #[serde(default = "default_template_dir")]
    pub template_dir: PathBuf,

    /// YAML documents to convert, render, or validate.
    #[serde(default = "default_yaml_dir")]
    pub yaml_dir: PathBuf,

    /// Inferred JSON schemas (written by `infer`, read by `validate`).
    #[serde(default = "default_schema_dir")]
    pub schema_dir: PathBuf,

    /// Direct YAML-to-JSON conversions.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Rendered Markdown files.
    #[serde(default = "default_markdown_dir")]
    pub markdown_dir: PathBuf,

    /// Lint and validation reports.
    #[serde(default = "default_result_dir")]
    pub result_dir: PathBuf,
}

impl Default for DirectoriesConfig {
    fn default() -> Self {
        Self {
            template_dir: default_template_dir(),
            yaml_dir: default_yaml_dir(),
            schema_dir: default_schema_dir(),
            output_dir: default_output_dir(),
            markdown_dir: default_markdown_dir(),
            result_dir: default_result_dir(),
        }
    }
}

fn default_template_dir() -> PathBuf {
    "template".into()
}
fn default_yaml_dir() -> PathBuf {
    "yaml".into()
}
fn default_schema_dir() -> PathBuf {
    "schema".into()
}
fn default_output_dir() -> PathBuf {
    "output".into()
}
fn default_markdown_dir() -> PathBuf {
    "md".into()
}
fn default_result_dir() -> PathBuf {
    "result".into()
}

/// `[batch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSettings {
    /// Only directory entries ending with this suffix are processed.
    #[serde(default = "default_source_suffix")]
    pub source_suffix: String,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            source_suffix: default_source_suffix(),
        }
    }
}

fn default_source_suffix() -> String {
    ".yaml".into()
}

/// `[lint]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LintConfig {
    /// yamllint executable.
    #[serde(default = "default_yamllint_cmd")]
    pub yamllint_cmd: String,

    /// markdownlint executable.
    #[serde(default = "default_markdownlint_cmd")]
    pub markdownlint_cmd: String,

    /// Max line length when linting templates before schema inference.
    #[serde(default = "default_schema_yaml_line_length")]
    pub schema_yaml_line_length: u32,

    /// Max line length when linting YAML before rendering.
    #[serde(default = "default_line_length")]
    pub yaml_line_length: u32,

    /// Max line length for rendered Markdown.
    #[serde(default = "default_line_length")]
    pub markdown_line_length: u32,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            yamllint_cmd: default_yamllint_cmd(),
            markdownlint_cmd: default_markdownlint_cmd(),
            schema_yaml_line_length: default_schema_yaml_line_length(),
            yaml_line_length: default_line_length(),
            markdown_line_length: default_line_length(),
        }
    }
}

fn default_yamllint_cmd() -> String {
    "yamllint".into()
}
fn default_markdownlint_cmd() -> String {
    "markdownlint".into()
}
fn default_schema_yaml_line_length() -> u32 {
    1000
}
fn default_line_length() -> u32 {
    120
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Path of the config file in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from(CONFIG_FILE_NAME)
}

/// Load `yamlkit.toml` from the working directory. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = default_config_path();

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| YamlkitError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| YamlkitError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Write a default config file at `path`. Refuses to overwrite an existing file.
pub fn init_config(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return Err(YamlkitError::config(format!(
            "{} already exists, not overwriting",
            path.display()
        )));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| YamlkitError::io(parent, e))?;
    }

    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| YamlkitError::Serialization(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| YamlkitError::io(path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path.to_path_buf())
}
