// file: src/models/search_result.rs
// description: Search result model with confidence scores
// reference: display rows built from search endpoint responses

use super::deserializers::string_or_number;
use super::source::DataSource;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedData {
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "patient_count")]
    pub patient_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<Vec<TrendPoint>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    pub source: DataSource,

    /// Relevance on a 0-100 scale
    #[serde(alias = "confidence_score", alias = "confidence")]
    pub confidence_score: f32,

    /// Timestamp as sent by the backend; see [`SearchResult::timestamp`]
    #[serde(default)]
    pub date: String,

    #[serde(default, skip_serializing_if = "Option::is_none", alias = "related_data")]
    pub related_data: Option<RelatedData>,
}

impl SearchResult {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        source: DataSource,
        confidence_score: f32,
        date: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            source,
            confidence_score: normalize_confidence(confidence_score),
            date: date.into(),
            related_data: None,
        }
    }

    pub fn with_related_data(mut self, related: RelatedData) -> Self {
        self.related_data = Some(related);
        self
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.date)
    }

    pub fn matches_text(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
            || self.description.to_lowercase().contains(needle_lower)
    }
}

/// Scores at or below 1.0 are treated as fractions and scaled to percent;
/// anything above 1.0 is already a percentage. The scale is discontinuous at
/// the boundary: 1.0 becomes 100% while 1.5 stays 1.5%. Results are clamped
/// to 0..=100 and non-finite scores become 0.
pub fn normalize_confidence(score: f32) -> f32 {
    if !score.is_finite() {
        return 0.0;
    }
    let percent = if score <= 1.0 { score * 100.0 } else { score };
    percent.clamp(0.0, 100.0)
}

/// Parses RFC 3339, naive date-times and plain dates. Naive values are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_deserialize_dashboard_payload() {
        let json = r#"{
            "id": 1,
            "title": "Patient Match: Similar Symptoms to Jane Doe",
            "description": "Found 3 patients with matching symptom patterns",
            "source": "Electronic Health Records",
            "confidenceScore": 92,
            "date": "2024-02-24T08:00:00",
            "relatedData": {
                "patientCount": 3,
                "trend": [{ "date": "Feb 20", "value": 1 }]
            }
        }"#;

        let result: SearchResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.id, "1");
        assert_eq!(result.source, DataSource::Ehr);
        assert_eq!(result.confidence_score, 92.0);
        let related = result.related_data.unwrap();
        assert_eq!(related.patient_count, Some(3));
        assert_eq!(related.trend.unwrap().len(), 1);
    }

    #[test]
    fn test_normalize_confidence() {
        assert!((normalize_confidence(0.87) - 87.0).abs() < 0.01);
        assert_eq!(normalize_confidence(92.0), 92.0);
        assert_eq!(normalize_confidence(140.0), 100.0);
        assert_eq!(normalize_confidence(-3.0), 0.0);
        assert_eq!(normalize_confidence(f32::NAN), 0.0);
    }

    #[test]
    fn test_normalize_confidence_at_fraction_boundary() {
        assert_eq!(normalize_confidence(1.0), 100.0);
        assert_eq!(normalize_confidence(1.5), 1.5);
        assert_eq!(normalize_confidence(0.0), 0.0);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 2, 24, 8, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-02-24T08:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-02-24T08:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-02-24 08:00:00"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-02-24"),
            Some(Utc.with_ymd_and_hms(2024, 2, 24, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("last tuesday"), None);
        assert_eq!(parse_timestamp(""), None);
    }
}
