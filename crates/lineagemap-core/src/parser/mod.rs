//! Decoding and validation of backend responses.
//!
//! The backend is asked for a single JSON object in the wire shape
//!
//! ```json
//! {"mappings": [{"source_column": "a", "target_column": "total",
//!                "transformation": "SUM", "confidence": 4}],
//!  "transformation_summary": ["SUM"]}
//! ```
//!
//! Decoding is strict: the only leniency is removal of a Markdown code fence
//! wrapping the whole answer, which chat models add even when told not to.
//! Validation walks the document by hand so errors can name the exact field.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};
#[cfg(feature = "tracing")]
use tracing::warn;

use crate::error::LineageError;
use crate::types::{ColumnMapping, LineageResult, MAX_CONFIDENCE, MIN_CONFIDENCE};

/// Parses and validates raw backend text into a [`LineageResult`].
pub fn parse_response(raw: &str) -> Result<LineageResult, LineageError> {
    let text = strip_code_fence(raw);
    let document: Value = serde_json::from_str(text).map_err(|err| {
        #[cfg(feature = "tracing")]
        warn!(error = %err, "backend returned a non-JSON response");
        LineageError::malformed(err.to_string(), raw)
    })?;

    let result = validate(&document, raw);

    #[cfg(feature = "tracing")]
    if let Err(err) = &result {
        warn!(code = err.code(), error = %err, "backend response rejected");
    }

    result
}

/// Returns the JSON payload, without a surrounding Markdown code fence if present.
pub fn strip_code_fence(raw: &str) -> &str {
    static FENCE_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = FENCE_REGEX.get_or_init(|| {
        Regex::new(r"(?s)\A```[A-Za-z0-9_-]*[ \t]*\r?\n(.*?)\r?\n?[ \t]*```\z")
            .expect("Invalid regex pattern")
    });

    let trimmed = raw.trim();
    re.captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|body| body.as_str().trim())
        .unwrap_or(trimmed)
}

fn validate(document: &Value, raw: &str) -> Result<LineageResult, LineageError> {
    let object = document
        .as_object()
        .ok_or_else(|| LineageError::schema("$", format!("expected a JSON object, found {}", kind(document))))?;

    if let Some(reason) = object.get("error").and_then(Value::as_str) {
        if !reason.trim().is_empty() {
            return Err(LineageError::ExtractionFailed(reason.trim().to_string()));
        }
    }

    let mappings = required_array(object, "mappings", "mappings")?
        .iter()
        .enumerate()
        .map(|(index, value)| validate_mapping(value, &format!("mappings[{index}]")))
        .collect::<Result<Vec<_>, _>>()?;

    let summary = required_array(object, "transformation_summary", "transformation_summary")?
        .iter()
        .enumerate()
        .map(|(index, value)| {
            value.as_str().map(|s| s.trim().to_string()).ok_or_else(|| {
                LineageError::schema(
                    format!("transformation_summary[{index}]"),
                    format!("expected a string, found {}", kind(value)),
                )
            })
        })
        .filter(|entry| !matches!(entry, Ok(s) if s.is_empty()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(LineageResult::new(mappings, summary, raw))
}

fn validate_mapping(value: &Value, path: &str) -> Result<ColumnMapping, LineageError> {
    let object = value.as_object().ok_or_else(|| {
        LineageError::schema(path, format!("expected an object, found {}", kind(value)))
    })?;

    let source_column = required_column(object, "source_column", path)?;
    let target_column = required_column(object, "target_column", path)?;
    let transformation = required_string(object, "transformation", path)?.trim().to_string();
    let confidence = required_confidence(object, path)?;

    Ok(ColumnMapping {
        source_column,
        target_column,
        transformation,
        confidence,
    })
}

fn required_array<'a>(
    object: &'a Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<&'a Vec<Value>, LineageError> {
    match object.get(key) {
        None => Err(LineageError::schema(path, "required field is missing")),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(LineageError::schema(
            path,
            format!("expected an array, found {}", kind(other)),
        )),
    }
}

fn required_string<'a>(
    object: &'a Map<String, Value>,
    key: &str,
    parent: &str,
) -> Result<&'a str, LineageError> {
    let path = format!("{parent}.{key}");
    match object.get(key) {
        None => Err(LineageError::schema(path, "required field is missing")),
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(LineageError::schema(
            path,
            format!("expected a string, found {}", kind(other)),
        )),
    }
}

fn required_column(
    object: &Map<String, Value>,
    key: &str,
    parent: &str,
) -> Result<String, LineageError> {
    let value = required_string(object, key, parent)?.trim();
    if value.is_empty() {
        return Err(LineageError::schema(
            format!("{parent}.{key}"),
            "column name must not be blank",
        ));
    }
    Ok(value.to_string())
}

fn required_confidence(object: &Map<String, Value>, parent: &str) -> Result<u8, LineageError> {
    let path = format!("{parent}.confidence");
    let value = object
        .get("confidence")
        .ok_or_else(|| LineageError::schema(&path, "required field is missing"))?;

    let out_of_range = |shown: &dyn std::fmt::Display| {
        LineageError::schema(
            &path,
            format!("{shown} is outside {MIN_CONFIDENCE}..={MAX_CONFIDENCE}"),
        )
    };

    match value {
        Value::Number(number) => {
            if let Some(n) = number.as_i64() {
                u8::try_from(n)
                    .ok()
                    .filter(|c| (MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(c))
                    .ok_or_else(|| out_of_range(&n))
            } else if number.is_u64() {
                Err(out_of_range(number))
            } else {
                Err(LineageError::schema(
                    &path,
                    format!("expected an integer, found {number}"),
                ))
            }
        }
        other => Err(LineageError::schema(
            &path,
            format!("expected an integer, found {}", kind(other)),
        )),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
