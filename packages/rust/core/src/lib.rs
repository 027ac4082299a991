//! Batch jobs for yamlkit.
//!
//! Each job implements [`batch::FileJob`] and is driven over a source
//! directory by [`batch::run_batch`]: schema inference from templates,
//! YAML-to-JSON conversion, Markdown rendering, and schema validation.

pub mod batch;
pub mod convert;
pub mod infer;
pub mod render;
pub mod validate;

#[cfg(test)]
mod testing;
