//! Best-effort schema inference from a sample document.
//!
//! The inferred schema is intentionally lossy: it only looks one level below
//! the root, and every leaf it describes is typed as `string` whatever the
//! sample actually holds. Deeper structure is not represented.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use yamlkit_shared::{Document, Mapping};

/// `$schema` URI written into every inferred schema.
pub const DRAFT_07: &str = "http://json-schema.org/draft-07/schema#";

/// Root schema: an object whose properties mirror the sample's top-level keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferredSchema {
    #[serde(rename = "$schema")]
    pub schema: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: IndexMap<String, PropertySchema>,
    pub required: Vec<String>,
}

/// Schema fragment for a single property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PropertySchema {
    Object {
        properties: IndexMap<String, PropertySchema>,
        required: Vec<String>,
    },
    Array {
        items: Box<PropertySchema>,
    },
    String,
}

impl PropertySchema {
    /// Classify a top-level value. Children of objects are always plain strings.
    fn for_value(value: &Document) -> Self {
        match value {
            Document::Mapping(children) => Self::Object {
                properties: children
                    .keys()
                    .map(|k| (k.clone(), Self::String))
                    .collect(),
                required: children.keys().cloned().collect(),
            },
            Document::Sequence(_) => Self::Array {
                items: Box::new(Self::String),
            },
            Document::Scalar(_) => Self::String,
        }
    }
}

/// Infer a schema from a root mapping. Every root key is required, in source order.
#[instrument(skip_all, fields(keys = root.len()))]
pub fn infer_schema(root: &Mapping) -> InferredSchema {
    let mut properties = IndexMap::with_capacity(root.len());
    let mut required = Vec::with_capacity(root.len());

    for (key, value) in root {
        properties.insert(key.clone(), PropertySchema::for_value(value));
        required.push(key.clone());
    }

    debug!(properties = properties.len(), "schema inferred");

    InferredSchema {
        schema: DRAFT_07.to_string(),
        kind: "object".to_string(),
        properties,
        required,
    }
}
