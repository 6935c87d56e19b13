// file: src/models/deserializers.rs
// description: lenient deserializers for loosely typed backend payloads

use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accepts an identifier sent either as a JSON string or a number
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(Error::custom(format!(
            "identifier must be a string or number, got {}",
            other
        ))),
    }
}

/// Accepts a list of strings, a single comma separated string, or null
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::String(s) => Ok(s
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                Value::Number(n) => Ok(n.to_string()),
                other => Err(Error::custom(format!("invalid list entry: {}", other))),
            })
            .collect(),
        other => Err(Error::custom(format!(
            "expected a list of strings, got {}",
            other
        ))),
    }
}

/// Accepts an optional score sent as a number or a numeric string
pub fn optional_score<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_f64()
            .map(|v| Some(v as f32))
            .ok_or_else(|| Error::custom("score out of range")),
        Value::String(s) => s
            .trim()
            .parse::<f32>()
            .map(Some)
            .map_err(|e| Error::custom(format!("invalid score '{}': {}", s, e))),
        other => Err(Error::custom(format!("invalid score: {}", other))),
    }
}

/// Accepts an age sent as an integer, a float or a numeric string.
/// Anything that is not a plausible whole age decodes as `None`.
pub fn optional_age<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let years = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    Ok(years
        .filter(|y| y.is_finite() && *y >= 0.0 && *y < 200.0)
        .map(|y| y.trunc() as u32))
}
