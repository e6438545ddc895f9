//! Rendering of resolved values as literal text.

use serde_yaml::{Number, Value};

/// Value that cannot be written into a configuration line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// The value has no textual rendering (top-level null, YAML tag, complex key).
    #[error("unsupported value type: {0}")]
    UnsupportedValueType(&'static str),
}

/// Render a resolved value for insertion after a `key:` / `key =` prefix.
///
/// - Strings already wrapped in matching `"` or `'` quotes are returned as is
/// - Other strings are wrapped in double quotes
/// - Booleans become `true` / `false`
/// - Sequences and mappings become single-line JSON (`["a", "b"]`, `{"k": 1}`)
/// - Numbers use their canonical decimal form
///
/// Formatting is idempotent for strings: feeding the output back in returns it
/// unchanged.
///
/// # Errors
///
/// Returns [`FormatError::UnsupportedValueType`] for a top-level null, tagged
/// values, or mappings with non-scalar keys.
pub fn format_value(value: &Value) -> Result<String, FormatError> {
    match value {
        Value::String(s) if is_quoted(s) => Ok(s.clone()),
        Value::String(s) => Ok(format!("\"{s}\"")),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(number_text(n)),
        Value::Sequence(_) | Value::Mapping(_) => {
            let mut out = String::new();
            write_json(value, &mut out)?;
            Ok(out)
        }
        Value::Null => Err(FormatError::UnsupportedValueType("null")),
        Value::Tagged(_) => Err(FormatError::UnsupportedValueType("tagged value")),
    }
}

/// Check for a single matching pair of surrounding quotes.
fn is_quoted(s: &str) -> bool {
    s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')))
}

fn number_text(n: &Number) -> String {
    if n.is_f64()
        && let Some(f) = n.as_f64()
    {
        if f.is_nan() {
            return "nan".to_owned();
        }
        if f.is_infinite() {
            return if f > 0.0 { "inf" } else { "-inf" }.to_owned();
        }
    }
    n.to_string()
}

fn json_number_text(n: &Number) -> String {
    if n.is_f64()
        && let Some(f) = n.as_f64()
    {
        if f.is_nan() {
            return "NaN".to_owned();
        }
        if f.is_infinite() {
            return if f > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
        }
    }
    n.to_string()
}

fn write_json_string(s: &str, out: &mut String) {
    // serde_json's Display never fails for a plain string value
    out.push_str(&serde_json::Value::String(s.to_owned()).to_string());
}

fn write_json(value: &Value, out: &mut String) -> Result<(), FormatError> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&json_number_text(n)),
        Value::String(s) => write_json_string(s, out),
        Value::Sequence(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_json(item, out)?;
            }
            out.push(']');
        }
        Value::Mapping(mapping) => {
            out.push('{');
            for (i, (key, item)) in mapping.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_json_string(&json_key(key)?, out);
                out.push_str(": ");
                write_json(item, out)?;
            }
            out.push('}');
        }
        Value::Tagged(_) => return Err(FormatError::UnsupportedValueType("tagged value")),
    }
    Ok(())
}

/// JSON object keys must be strings; scalar keys are stringified.
fn json_key(key: &Value) -> Result<String, FormatError> {
    match key {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(json_number_text(n)),
        Value::Null => Ok("null".to_owned()),
        Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => {
            Err(FormatError::UnsupportedValueType("non-scalar mapping key"))
        }
    }
}
