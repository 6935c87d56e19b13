// file: src/utils/validation.rs
// description: input validation and text normalization helpers
// reference: input validation patterns

use crate::error::{AssistError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    static ref CLINICIAN_ID: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._:-]{0,127}$").unwrap();
}

pub struct Validator;

impl Validator {
    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(AssistError::Validation(format!(
                "Invalid URL format: {}",
                url
            )));
        }
        Ok(())
    }

    /// Counts characters of the trimmed query, not bytes.
    pub fn meets_min_length(query: &str, min_chars: usize) -> bool {
        query.trim().chars().count() >= min_chars
    }

    pub fn validate_content_not_empty(content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(AssistError::Validation("Content is empty".to_string()));
        }
        Ok(())
    }

    pub fn validate_clinician_id(id: &str) -> Result<()> {
        if !CLINICIAN_ID.is_match(id) {
            return Err(AssistError::Validation(format!(
                "Invalid clinician identifier: '{}'",
                id
            )));
        }
        Ok(())
    }

    pub fn validate_confidence(threshold: f32) -> Result<()> {
        if !(0.0..=100.0).contains(&threshold) {
            return Err(AssistError::Validation(format!(
                "Confidence threshold must be between 0 and 100, got {}",
                threshold
            )));
        }
        Ok(())
    }

    pub fn validate_similarity_threshold(threshold: f32) -> Result<()> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(AssistError::Validation(format!(
                "Similarity threshold must be between 0 and 1, got {}",
                threshold
            )));
        }
        Ok(())
    }

    /// Patient metadata must be a non-empty JSON object.
    pub fn parse_metadata(raw: &str) -> Result<Value> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| AssistError::Validation(format!("Metadata is not valid JSON: {}", e)))?;

        match value.as_object() {
            Some(map) if !map.is_empty() => Ok(value),
            _ => Err(AssistError::Validation(
                "Metadata must be a non-empty JSON object".to_string(),
            )),
        }
    }

    pub fn collapse_whitespace(text: &str) -> String {
        WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned()
    }

    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        if text.chars().count() <= max_chars {
            text.to_string()
        } else {
            let cut: String = text.chars().take(max_chars).collect();
            format!("{}...", cut)
        }
    }
}
