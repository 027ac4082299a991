//! The parsed-YAML document tree shared by every transformer.

use std::fmt;

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::error::{Result, YamlkitError};

/// Ordered key/value pairs of a YAML mapping. Keys are unique.
pub type Mapping = IndexMap<String, Document>;

/// A YAML document as a finite tree of mappings, sequences, and scalars.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Mapping(Mapping),
    Sequence(Vec<Document>),
    Scalar(Scalar),
}

/// Leaf value of a [`Document`].
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

/// YAML number, kept in the widest representation the parser produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl Document {
    /// Parse a single YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let value: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(|e| YamlkitError::parse(e.to_string()))?;
        Self::from_yaml_value(value)
    }

    /// Convert a generic `serde_yaml` value into a document tree.
    pub fn from_yaml_value(value: serde_yaml::Value) -> Result<Self> {
        use serde_yaml::Value;

        Ok(match value {
            Value::Null => Self::Scalar(Scalar::Null),
            Value::Bool(b) => Self::Scalar(Scalar::Bool(b)),
            Value::Number(n) => Self::Scalar(Scalar::Number(Number::from(&n))),
            Value::String(s) => Self::Scalar(Scalar::String(s)),
            Value::Sequence(items) => Self::Sequence(
                items
                    .into_iter()
                    .map(Self::from_yaml_value)
                    .collect::<Result<_>>()?,
            ),
            Value::Mapping(map) => {
                let mut out = Mapping::with_capacity(map.len());
                for (key, value) in map {
                    let key = key_to_string(key)?;
                    match out.entry(key) {
                        Entry::Occupied(e) => {
                            return Err(YamlkitError::parse(format!(
                                "duplicate mapping key `{}`",
                                e.key()
                            )));
                        }
                        Entry::Vacant(e) => {
                            e.insert(Self::from_yaml_value(value)?);
                        }
                    }
                }
                Self::Mapping(out)
            }
            Value::Tagged(tagged) => Self::from_yaml_value(tagged.value)?,
        })
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Structural copy into a JSON value. Key order is preserved.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;

        match self {
            Self::Mapping(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Self::Sequence(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Scalar(Scalar::Null) => Value::Null,
            Self::Scalar(Scalar::Bool(b)) => Value::Bool(*b),
            Self::Scalar(Scalar::String(s)) => Value::String(s.clone()),
            Self::Scalar(Scalar::Number(n)) => match *n {
                Number::Int(i) => Value::from(i),
                Number::UInt(u) => Value::from(u),
                // NaN and infinities have no JSON form.
                Number::Float(f) => serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
            },
        }
    }
}

/// Mapping keys must be scalars; non-string scalars use their text form.
fn key_to_string(key: serde_yaml::Value) -> Result<String> {
    use serde_yaml::Value;

    match key {
        Value::String(s) => Ok(s),
        Value::Null => Ok(Scalar::Null.to_string()),
        Value::Bool(b) => Ok(Scalar::Bool(b).to_string()),
        Value::Number(n) => Ok(Number::from(&n).to_string()),
        Value::Tagged(tagged) => key_to_string(tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => Err(YamlkitError::parse(
            "mapping keys must be scalars, found a collection",
        )),
    }
}

impl From<&serde_yaml::Number> for Number {
    fn from(n: &serde_yaml::Number) -> Self {
        if let Some(i) = n.as_i64() {
            Self::Int(i)
        } else if let Some(u) = n.as_u64() {
            Self::UInt(u)
        } else {
            Self::Float(n.as_f64().unwrap_or(f64::NAN))
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Int(i) => write!(f, "{i}"),
            Self::UInt(u) => write!(f, "{u}"),
            Self::Float(x) if x.is_nan() => f.write_str(".nan"),
            Self::Float(x) if x.is_infinite() => {
                f.write_str(if x.is_sign_positive() { ".inf" } else { "-.inf" })
            }
            Self::Float(x) if x.fract() == 0.0 && x.abs() < 1e16 => write!(f, "{x:.1}"),
            Self::Float(x) => write!(f, "{x}"),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string(s: &str) -> Document {
        Document::Scalar(Scalar::String(s.into()))
    }

    #[test]
    fn parses_mapping_in_source_order() {
        let doc = Document::from_yaml_str("zeta: 1\nalpha: two\nmid: [a, b]\n").unwrap();
        let map = doc.as_mapping().expect("root mapping");
        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
        assert_eq!(map["alpha"], string("two"));
        assert_eq!(
            map["mid"],
            Document::Sequence(vec![string("a"), string("b")])
        );
    }

    #[test]
    fn scalar_keys_are_stringified() {
        let doc = Document::from_yaml_str("1: one\ntrue: yes\n~: nothing\n").unwrap();
        let keys: Vec<_> = doc.as_mapping().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["1", "true", "null"]);
    }

    #[test]
    fn colliding_keys_are_rejected() {
        let err = Document::from_yaml_str("1: a\n\"1\": b\n").unwrap_err();
        assert!(err.to_string().contains("duplicate mapping key"));
    }

    #[test]
    fn collection_keys_are_rejected() {
        let err = Document::from_yaml_str("? [a, b]\n: c\n").unwrap_err();
        assert!(err.is_file_scoped());
    }

    #[test]
    fn tags_are_unwrapped() {
        let doc = Document::from_yaml_str("value: !custom hello\n").unwrap();
        assert_eq!(doc.as_mapping().unwrap()["value"], string("hello"));
    }

    #[test]
    fn malformed_yaml_is_parse_error() {
        let err = Document::from_yaml_str("key: [unclosed\n").unwrap_err();
        assert!(err.to_string().starts_with("parse error"));
    }

    #[test]
    fn empty_input_is_null() {
        let doc = Document::from_yaml_str("").unwrap();
        assert_eq!(doc, Document::Scalar(Scalar::Null));
        assert!(doc.as_mapping().is_none());
    }

    #[test]
    fn scalar_text_forms() {
        assert_eq!(Scalar::Null.to_string(), "null");
        assert_eq!(Scalar::Bool(false).to_string(), "false");
        assert_eq!(Scalar::Number(Number::Int(-3)).to_string(), "-3");
        assert_eq!(Scalar::Number(Number::Float(2.0)).to_string(), "2.0");
        assert_eq!(Scalar::Number(Number::Float(0.25)).to_string(), "0.25");
        assert_eq!(Scalar::Number(Number::Float(f64::NEG_INFINITY)).to_string(), "-.inf");
    }

    #[test]
    fn to_json_keeps_order_and_types() {
        let doc = Document::from_yaml_str("b: 1\na: [true, null, 1.5, x]\n").unwrap();
        let json = doc.to_json();
        assert_eq!(
            serde_json::to_string(&json).unwrap(),
            r#"{"b":1,"a":[true,null,1.5,"x"]}"#
        );
    }

    #[test]
    fn non_finite_floats_become_null() {
        let doc = Document::from_yaml_str("x: .nan\n").unwrap();
        assert_eq!(doc.to_json()["x"], serde_json::Value::Null);
    }
}
