//! yamlkit CLI: batch tooling for YAML templates.
//!
//! Lints templates, infers JSON schemas from them, converts documents to
//! JSON, renders them to Markdown and validates them against their schema.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
