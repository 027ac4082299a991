//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use yamlkit_core::batch::{
    BatchConfig, BatchReport, FileJob, FileOutcome, FileStatus, ProgressReporter, run_batch,
};
use yamlkit_core::convert::{ConvertConfig, ConvertJob};
use yamlkit_core::infer::{InferConfig, InferJob};
use yamlkit_core::render::{RenderConfig, RenderJob};
use yamlkit_core::validate::{ValidateConfig, ValidateJob};
use yamlkit_lint::{MarkdownLint, YamlLint};
use yamlkit_shared::{AppConfig, default_config_path, init_config, load_config, load_config_from};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// yamlkit: lint, convert, render and validate YAML templates.
#[derive(Parser)]
#[command(
    name = "yamlkit",
    version,
    about = "Lint YAML templates, infer JSON schemas, convert to JSON or Markdown, and validate.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file (defaults to ./yamlkit.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Lint sample templates and infer a JSON schema from each.
    Infer {
        /// Template directory (defaults to `directories.template_dir`).
        #[arg(long)]
        source: Option<PathBuf>,

        /// Output directory for schemas.
        #[arg(long)]
        schema_dir: Option<PathBuf>,

        /// Output directory for lint and error reports.
        #[arg(long)]
        result_dir: Option<PathBuf>,
    },

    /// Convert YAML documents to JSON.
    Convert {
        /// YAML directory (defaults to `directories.yaml_dir`).
        #[arg(long)]
        source: Option<PathBuf>,

        /// Output directory for JSON files.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Output directory for error reports.
        #[arg(long)]
        result_dir: Option<PathBuf>,
    },

    /// Render YAML documents to Markdown and lint both.
    Render {
        /// YAML directory (defaults to `directories.yaml_dir`).
        #[arg(long)]
        source: Option<PathBuf>,

        /// Output directory for Markdown files.
        #[arg(long)]
        markdown_dir: Option<PathBuf>,

        /// Output directory for lint results.
        #[arg(long)]
        result_dir: Option<PathBuf>,
    },

    /// Validate YAML documents against their inferred schemas.
    Validate {
        /// YAML directory (defaults to `directories.yaml_dir`).
        #[arg(long)]
        source: Option<PathBuf>,

        /// Directory holding `<name>.json` schemas.
        #[arg(long)]
        schema_dir: Option<PathBuf>,

        /// Output directory for validation results.
        #[arg(long)]
        result_dir: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "yamlkit=info",
        1 => "yamlkit=debug",
        _ => "yamlkit=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config;

    match cli.command {
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(config_path),
            ConfigAction::Show => cmd_config_show(&load(config_path.as_ref())?),
        },
        Command::Infer {
            source,
            schema_dir,
            result_dir,
        } => {
            let mut config = load(config_path.as_ref())?;
            override_dir(&mut config.directories.template_dir, source);
            override_dir(&mut config.directories.schema_dir, schema_dir);
            override_dir(&mut config.directories.result_dir, result_dir);

            let linter = YamlLint::new(config.lint.yamllint_cmd.clone());
            let job = InferJob::new(InferConfig::from(&config), Box::new(linter));
            run_job(&config, config.directories.template_dir.clone(), &job)
        }
        Command::Convert {
            source,
            output_dir,
            result_dir,
        } => {
            let mut config = load(config_path.as_ref())?;
            override_dir(&mut config.directories.yaml_dir, source);
            override_dir(&mut config.directories.output_dir, output_dir);
            override_dir(&mut config.directories.result_dir, result_dir);

            let job = ConvertJob::new(ConvertConfig::from(&config));
            run_job(&config, config.directories.yaml_dir.clone(), &job)
        }
        Command::Render {
            source,
            markdown_dir,
            result_dir,
        } => {
            let mut config = load(config_path.as_ref())?;
            override_dir(&mut config.directories.yaml_dir, source);
            override_dir(&mut config.directories.markdown_dir, markdown_dir);
            override_dir(&mut config.directories.result_dir, result_dir);

            let job = RenderJob::new(
                RenderConfig::from(&config),
                Box::new(YamlLint::new(config.lint.yamllint_cmd.clone())),
                Box::new(MarkdownLint::new(config.lint.markdownlint_cmd.clone())),
            );
            run_job(&config, config.directories.yaml_dir.clone(), &job)
        }
        Command::Validate {
            source,
            schema_dir,
            result_dir,
        } => {
            let mut config = load(config_path.as_ref())?;
            override_dir(&mut config.directories.yaml_dir, source);
            override_dir(&mut config.directories.schema_dir, schema_dir);
            override_dir(&mut config.directories.result_dir, result_dir);

            let job = ValidateJob::new(ValidateConfig::from(&config));
            run_job(&config, config.directories.yaml_dir.clone(), &job)
        }
    }
}

fn load(path: Option<&PathBuf>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

fn override_dir(target: &mut PathBuf, value: Option<PathBuf>) {
    if let Some(v) = value {
        *target = v;
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

/// Run one batch job and print its summary. Per-file failures do not fail the command.
fn run_job(config: &AppConfig, source_dir: PathBuf, job: &dyn FileJob) -> Result<()> {
    let batch = BatchConfig::from_app(config, source_dir);
    info!(job = job.name(), source = %batch.source_dir.display(), "starting batch");

    let reporter = CliProgress::new();
    let report = run_batch(&batch, job, &reporter)?;

    print_summary(&report);
    Ok(())
}

fn print_summary(report: &BatchReport) {
    println!();
    println!("  {} finished", report.job);
    println!("  Files:     {}", report.total());
    println!("  Succeeded: {}", report.succeeded());
    println!("  Failed:    {}", report.failed());
    println!("  Written:   {}", report.artifact_count());

    for outcome in &report.outcomes {
        if let FileStatus::Failed { kind, report } = &outcome.status {
            println!("    {} ({kind}): see {}", outcome.file_name, report.display());
        }
    }
    println!();
}

fn cmd_config_init(path: Option<PathBuf>) -> Result<()> {
    let path = init_config(&path.unwrap_or_else(default_config_path))?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif bar.
struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} [{pos}/{len}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        bar.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { bar }
    }
}

impl ProgressReporter for CliProgress {
    fn file_started(&self, file_name: &str, _current: usize, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_message(file_name.to_string());
    }

    fn file_finished(&self, outcome: &FileOutcome) {
        if let FileStatus::Failed { kind, .. } = &outcome.status {
            self.bar
                .println(format!("  {} failed: {kind}", outcome.file_name));
        }
        self.bar.inc(1);
    }

    fn done(&self, _report: &BatchReport) {
        self.bar.finish_and_clear();
    }
}
