// file: src/models/patient.rs
// description: patient records returned by the backend and the local patient directory

use super::deserializers::{optional_age, optional_score, string_list, string_or_number};
use super::search_result::SearchResult;
use super::source::DataSource;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Raw patient fields as the search and similarity endpoints return them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientMatch {
    #[serde(
        default,
        alias = "patient_id",
        deserialize_with = "string_or_number"
    )]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "optional_age")]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub diagnosis: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub medications: Vec<String>,
    #[serde(default, alias = "lastVisit")]
    pub last_visit: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(
        default,
        alias = "similarity",
        alias = "similarity_score",
        deserialize_with = "optional_score"
    )]
    pub score: Option<f32>,
}

impl PatientMatch {
    /// Decodes a similarity payload. Fields that fail to decode are dropped
    /// one by one so the rest of the record survives.
    pub fn from_payload(payload: Value) -> Self {
        match PatientMatch::deserialize(&payload) {
            Ok(record) => record,
            Err(e) => {
                warn!("Patient payload only partially decoded: {}", e);
                Self::salvage(payload)
            }
        }
    }

    fn salvage(payload: Value) -> Self {
        let Value::Object(fields) = payload else {
            return Self::default();
        };

        let usable: Map<String, Value> = fields
            .into_iter()
            .filter(|(key, value)| {
                let single = Map::from_iter([(key.clone(), value.clone())]);
                let keep = PatientMatch::deserialize(&Value::Object(single)).is_ok();
                if !keep {
                    warn!("Dropping undecodable patient field '{}'", key);
                }
                keep
            })
            .collect();

        PatientMatch::deserialize(&Value::Object(usable)).unwrap_or_else(|e| {
            warn!("Discarding patient payload: {}", e);
            Self::default()
        })
    }

    /// Builds a display row. `score` overrides the embedded score when the
    /// backend sends it outside the payload. A match without any score was
    /// already selected by the backend and is shown at full confidence.
    pub fn into_search_result(self, score: Option<f32>) -> SearchResult {
        let confidence = score.or(self.score).unwrap_or(100.0);
        let title = format!(
            "Patient {}: {}",
            self.name.as_deref().unwrap_or(&self.id),
            self.diagnosis.as_deref().unwrap_or("Unspecified diagnosis")
        );
        let description = self.describe();

        SearchResult::new(
            self.id,
            title,
            description,
            DataSource::Ehr,
            confidence,
            self.last_visit.unwrap_or_default(),
        )
    }

    fn describe(&self) -> String {
        let mut parts = Vec::new();

        match (self.age, self.gender.as_deref()) {
            (Some(age), Some(gender)) => parts.push(format!("Age {}, {}", age, gender)),
            (Some(age), None) => parts.push(format!("Age {}", age)),
            (None, Some(gender)) => parts.push(gender.to_string()),
            (None, None) => {}
        }

        if !self.medications.is_empty() {
            parts.push(format!("Medications: {}", self.medications.join(", ")));
        }

        if let Some(visit) = self.last_visit.as_deref().filter(|v| !v.is_empty()) {
            parts.push(format!("Last visit: {}", visit));
        }

        if let Some(notes) = self.notes.as_deref().filter(|n| !n.trim().is_empty()) {
            parts.push(notes.trim().to_string());
        }

        parts.join(". ")
    }
}

/// Similarity hit as returned by `/search_similar_patients`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoredPatient {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub payload: Value,
    #[serde(default, deserialize_with = "optional_score")]
    pub score: Option<f32>,
}

impl ScoredPatient {
    pub fn into_search_result(self) -> SearchResult {
        let mut record = PatientMatch::from_payload(self.payload);
        if record.id.is_empty() {
            record.id = self.id;
        }
        record.into_search_result(self.score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatientStatus {
    Active,
    Inactive,
}

impl PatientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatientStatus::Active => "Active",
            PatientStatus::Inactive => "Inactive",
        }
    }
}

/// Entry in the local patient directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub status: PatientStatus,
    #[serde(default, alias = "last_visit")]
    pub last_visit: String,
    #[serde(default)]
    pub condition: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_patient_match_to_result() {
        let record: PatientMatch = serde_json::from_value(json!({
            "patient_id": 42,
            "age": 54,
            "gender": "female",
            "diagnosis": "Diabetes",
            "medications": ["metformin", "lisinopril"],
            "last_visit": "2024-02-20",
            "similarity": 0.91
        }))
        .unwrap();

        let result = record.into_search_result(None);
        assert_eq!(result.id, "42");
        assert_eq!(result.title, "Patient 42: Diabetes");
        assert_eq!(result.source, DataSource::Ehr);
        assert!((result.confidence_score - 91.0).abs() < 0.01);
        assert_eq!(result.date, "2024-02-20");
        assert!(result.description.contains("Age 54, female"));
        assert!(result.description.contains("metformin, lisinopril"));
    }

    #[test]
    fn test_unscored_match_gets_full_confidence() {
        let record = PatientMatch {
            id: "p-9".to_string(),
            name: Some("Jane Doe".to_string()),
            ..Default::default()
        };
        let result = record.into_search_result(None);
        assert_eq!(result.confidence_score, 100.0);
        assert_eq!(result.title, "Patient Jane Doe: Unspecified diagnosis");
        assert!(result.description.is_empty());
    }

    #[test]
    fn test_scored_patient_uses_outer_id_and_score() {
        let hit: ScoredPatient = serde_json::from_value(json!({
            "id": 7,
            "payload": { "diagnosis": "Asthma", "age": 31 },
            "score": 0.82
        }))
        .unwrap();

        let result = hit.into_search_result();
        assert_eq!(result.id, "7");
        assert_eq!(result.title, "Patient 7: Asthma");
        assert!((result.confidence_score - 82.0).abs() < 0.01);
    }

    #[test]
    fn test_scored_patient_with_string_age_keeps_fields() {
        let hit: ScoredPatient = serde_json::from_value(json!({
            "id": 7,
            "payload": { "diagnosis": "Asthma", "age": "31", "name": "Jane" },
            "score": 0.8
        }))
        .unwrap();

        let result = hit.into_search_result();
        assert_eq!(result.title, "Patient Jane: Asthma");
        assert!(result.description.contains("Age 31"));
    }

    #[test]
    fn test_partially_invalid_payload_keeps_decodable_fields() {
        let record = PatientMatch::from_payload(json!({
            "name": "Jane",
            "diagnosis": "Asthma",
            "medications": { "dose": 2 },
            "gender": ["f"],
            "last_visit": "2024-02-20"
        }));

        assert_eq!(record.name.as_deref(), Some("Jane"));
        assert_eq!(record.diagnosis.as_deref(), Some("Asthma"));
        assert_eq!(record.last_visit.as_deref(), Some("2024-02-20"));
        assert!(record.medications.is_empty());
        assert!(record.gender.is_none());
    }

    #[test]
    fn test_non_object_payload_decodes_empty() {
        assert_eq!(PatientMatch::from_payload(json!("Asthma")), PatientMatch::default());
    }

    #[test]
    fn test_patient_directory_entry() {
        let patient: Patient = serde_json::from_value(json!({
            "id": "P001",
            "name": "Sarah Johnson",
            "email": "sarah.j@example.com",
            "status": "Active",
            "lastVisit": "2024-02-20",
            "condition": "Hypertension"
        }))
        .unwrap();

        assert_eq!(patient.status, PatientStatus::Active);
        assert_eq!(patient.last_visit, "2024-02-20");
    }
}
