//! Pretty JSON output with a configurable indent width.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use yamlkit_shared::{Result, YamlkitError};

/// Serialize `value` as pretty JSON indented by `indent` spaces, with a trailing newline.
pub fn to_json_string<T: Serialize + ?Sized>(value: &T, indent: usize) -> Result<String> {
    let indent = " ".repeat(indent);
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));

    value
        .serialize(&mut ser)
        .map_err(|e| YamlkitError::Serialization(format!("JSON serialization failed: {e}")))?;

    let mut text = String::from_utf8(buf)
        .map_err(|e| YamlkitError::Serialization(format!("JSON output is not UTF-8: {e}")))?;
    text.push('\n');
    Ok(text)
}
