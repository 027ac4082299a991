//! JSON Schema inference, schema validation, and JSON output for yamlkit.
//!
//! - [`infer_schema`] derives a shallow draft-07 schema from a sample document
//! - [`validate_document`] checks a document against a schema
//! - [`to_json_string`] writes JSON with a chosen indent width

mod infer;
mod json;
mod validate;

pub use infer::{DRAFT_07, InferredSchema, PropertySchema, infer_schema};
pub use json::to_json_string;
pub use validate::{
    INVALID_HEADER, PathSegment, VALID_MESSAGE, ValidationReport, Violation, validate_document,
};
