//! Shared types, error model, and configuration for yamlkit.
//!
//! This crate is the foundation depended on by all other yamlkit crates.
//! It provides:
//! - [`YamlkitError`], the unified error type
//! - The parsed-YAML tree ([`Document`], [`Scalar`], [`Number`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod document;
pub mod error;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, BatchSettings, CONFIG_FILE_NAME, DirectoriesConfig, LintConfig,
    default_config_path, init_config, load_config, load_config_from,
};
pub use document::{Document, Mapping, Number, Scalar};
pub use error::{ErrorKind, Result, YamlkitError};
