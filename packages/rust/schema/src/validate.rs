//! Document validation against a JSON Schema.

use std::fmt;

use serde_json::Value;
use tracing::{debug, instrument};

use yamlkit_shared::{Result, YamlkitError};

/// Report text for a document with no violations.
pub const VALID_MESSAGE: &str = "El fichero YAML es válido según el esquema JSON.";

/// First line of the report for a document with violations.
pub const INVALID_HEADER: &str = "El fichero YAML no es válido:";

/// One step of a path into the validated document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// A single schema violation.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Location of the offending value, empty for the document root.
    pub path: Vec<PathSegment>,
    /// Validator message.
    pub message: String,
}

/// Outcome of validating one document. Violations are ordered by path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Plain-text report: a success line, or a header followed by one line per violation.
    pub fn render(&self) -> String {
        if self.is_valid() {
            return VALID_MESSAGE.to_string();
        }

        let mut lines = Vec::with_capacity(self.violations.len() + 1);
        lines.push(INVALID_HEADER.to_string());
        lines.extend(self.violations.iter().map(Violation::to_string));
        lines.join("\n")
    }
}

/// Validate `instance` against `schema`.
///
/// The draft is picked from the schema's `$schema` keyword. A schema that
/// cannot be compiled is a validation error rather than a report.
#[instrument(skip_all)]
pub fn validate_document(instance: &Value, schema: &Value) -> Result<ValidationReport> {
    let validator = jsonschema::validator_for(schema)
        .map_err(|e| YamlkitError::validation(format!("invalid schema: {e}")))?;

    let mut violations: Vec<Violation> = validator
        .iter_errors(instance)
        .map(|err| Violation {
            path: resolve_pointer(instance, &err.instance_path.to_string()),
            message: err.to_string(),
        })
        .collect();

    // Stable: violations at the same path keep validator order.
    violations.sort_by(|a, b| a.path.cmp(&b.path));

    debug!(violations = violations.len(), "validation finished");

    Ok(ValidationReport { violations })
}

/// Split a JSON pointer into segments, using the instance to tell array
/// indices from object keys that happen to be numeric.
fn resolve_pointer(instance: &Value, pointer: &str) -> Vec<PathSegment> {
    let mut current = Some(instance);
    let mut path = Vec::new();

    for raw in pointer.split('/').skip(1) {
        let token = raw.replace("~1", "/").replace("~0", "~");

        let segment = match (current, token.parse::<usize>()) {
            (Some(Value::Array(_)), Ok(index)) => PathSegment::Index(index),
            _ => PathSegment::Key(token),
        };

        current = match (&segment, current) {
            (PathSegment::Index(i), Some(Value::Array(items))) => items.get(*i),
            (PathSegment::Key(k), Some(Value::Object(map))) => map.get(k),
            _ => None,
        };
        path.push(segment);
    }

    path
}

/// Render a path as a list literal, e.g. `['tags', 0]`.
pub(crate) fn format_path(path: &[PathSegment]) -> String {
    let parts: Vec<String> = path.iter().map(PathSegment::to_string).collect();
    format!("[{}]", parts.join(", "))
}

/// Quote a key: single quotes unless the key contains one and no double quote.
fn quote_key(key: &str) -> String {
    let quote = if key.contains('\'') && !key.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(key.len() + 2);
    out.push(quote);
    for c in key.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(&quote_key(key)),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error en {}: {}", format_path(&self.path), self.message)
    }
}
