//! Serde types for the analyzer's JSON result contract.
//!
//! The contract is best-effort: every field is optional, malformed entries
//! are skipped, and only a payload that is not a JSON object at all is
//! rejected.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ResultParseError {
    #[error("analyzer output is not valid JSON: {0}")]
    Syntax(#[from] serde_json::Error),
    #[error("analyzer output is JSON but not an object")]
    NotAnObject,
}

/// A single rule violation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Finding {
    #[serde(default, deserialize_with = "lenient_string")]
    pub rule_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub severity: Option<String>,
    /// 1-based line. Zero, negative, and unparsable values read as absent.
    #[serde(default, deserialize_with = "lenient_line")]
    pub line: Option<u32>,
}

/// An incompatibility between the document and its baseline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BreakingChange {
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub client_impact: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisResult {
    pub findings: Vec<Finding>,
    pub breaking_changes: Vec<BreakingChange>,
    pub status: Option<String>,
    pub summary: Option<Value>,
}

impl AnalysisResult {
    pub fn parse(raw: &str) -> Result<Self, ResultParseError> {
        let value: Value = serde_json::from_str(raw)?;
        let Value::Object(mut object) = value else {
            return Err(ResultParseError::NotAnObject);
        };

        let findings = entries(object.remove("findings"), "findings");
        let breaking_changes = entries(object.remove("breaking_changes"), "breaking_changes");
        let status = object
            .remove("status")
            .and_then(|s| s.as_str().map(ToString::to_string));
        let summary = object.remove("summary").filter(Value::is_object);

        Ok(Self {
            findings,
            breaking_changes,
            status,
            summary,
        })
    }
}

/// Deserialize each array element independently, skipping the ones that do
/// not fit. Absent or `null` arrays are empty.
fn entries<T: for<'de> Deserialize<'de>>(value: Option<Value>, field: &str) -> Vec<T> {
    let items = match value {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(items)) => items,
        Some(other) => {
            tracing::warn!(field, kind = value_kind(&other), "Ignoring non-array result field");
            return Vec::new();
        }
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(field, index, error = %e, "Skipping malformed result entry");
                None
            }
        })
        .collect()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn lenient_line<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let line = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 1.0).map(|f| f as u64)),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(line
        .filter(|l| *l >= 1)
        .map(|l| u32::try_from(l).unwrap_or(u32::MAX)))
}
