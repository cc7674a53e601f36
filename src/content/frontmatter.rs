//! Front-matter codec
//!
//! An article on disk is a YAML metadata block fenced by `---` lines,
//! followed by the raw body:
//!
//! ```text
//! ---
//! title: Hello
//! date: 2025-01-01
//! ---
//! Body text...
//! ```

use indexmap::IndexMap;
use serde_yaml::Value;

use crate::error::{ContentError, Result};

/// Flat, ordered metadata mapping
pub type Metadata = IndexMap<String, Value>;

const DELIMITER: &str = "---";

/// Split the metadata block from the body
///
/// Text that does not open with a `---` line has no metadata and is returned
/// whole as the body. The body is everything after the closing delimiter
/// line, byte for byte.
pub fn decode(raw: &str) -> Result<(Metadata, &str)> {
    let (first, after_open) = split_line(raw);
    if first != DELIMITER {
        return Ok((Metadata::new(), raw));
    }

    let mut cursor = after_open;
    let mut block_len = 0;
    while !cursor.is_empty() {
        let (line, next) = split_line(cursor);
        if line == DELIMITER {
            let metadata = parse_block(&after_open[..block_len])?;
            return Ok((metadata, next));
        }
        block_len += cursor.len() - next.len();
        cursor = next;
    }

    Err(ContentError::malformed("unterminated metadata block"))
}

/// Serialize metadata and body into the on-disk form read by [`decode`]
pub fn encode(metadata: &Metadata, body: &str) -> Result<String> {
    let mut out = String::with_capacity(body.len() + 64);
    out.push_str(DELIMITER);
    out.push('\n');

    if !metadata.is_empty() {
        for (key, value) in metadata {
            if !is_scalar(value) {
                return Err(ContentError::malformed(format!(
                    "metadata value for '{}' is not a scalar",
                    key
                )));
            }
        }
        let yaml = serde_yaml::to_string(metadata)
            .map_err(|e| ContentError::malformed(format!("cannot serialize metadata: {}", e)))?;
        out.push_str(&yaml);
        if !yaml.ends_with('\n') {
            out.push('\n');
        }
    }

    out.push_str(DELIMITER);
    out.push('\n');
    out.push_str(body);
    Ok(out)
}

/// Read a required-ish scalar as text; `None` for missing or null values
pub fn scalar_string(metadata: &Metadata, key: &str) -> Option<String> {
    match metadata.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn parse_block(block: &str) -> Result<Metadata> {
    if block.trim().is_empty() {
        return Ok(Metadata::new());
    }

    let value: Value = serde_yaml::from_str(block)
        .map_err(|e| ContentError::malformed(format!("invalid metadata block: {}", e)))?;

    let mapping = match value {
        Value::Mapping(mapping) => mapping,
        // A block holding only comments
        Value::Null => return Ok(Metadata::new()),
        _ => {
            return Err(ContentError::malformed(
                "metadata block is not a key/value mapping",
            ))
        }
    };

    let mut metadata = Metadata::with_capacity(mapping.len());
    for (key, value) in mapping {
        let key = match key {
            Value::String(key) => key,
            other => {
                return Err(ContentError::malformed(format!(
                    "metadata key {:?} is not a string",
                    other
                )))
            }
        };
        if !is_scalar(&value) {
            return Err(ContentError::malformed(format!(
                "metadata value for '{}' must be a plain scalar",
                key
            )));
        }
        metadata.insert(key, value);
    }
    Ok(metadata)
}

fn is_scalar(value: &Value) -> bool {
    matches!(
        value,
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)
    )
}

/// Returns the line without its terminator and the text after the terminator
fn split_line(s: &str) -> (&str, &str) {
    match s.find('\n') {
        Some(pos) => {
            let line = &s[..pos];
            (line.strip_suffix('\r').unwrap_or(line), &s[pos + 1..])
        }
        None => (s, ""),
    }
}
