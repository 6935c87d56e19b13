// file: src/backend/wire.rs
// description: request and response bodies exchanged with the assistant backend

use crate::models::{PatientMatch, ScoredPatient, SearchResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinician_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity_threshold: Option<f32>,
}

/// A patient entry in either of the shapes the backend emits. Flat entries
/// stay raw until conversion so one badly typed field cannot reject the
/// whole response.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PatientHit {
    Scored(ScoredPatient),
    Plain(Value),
}

impl PatientHit {
    pub fn into_search_result(self) -> SearchResult {
        match self {
            PatientHit::Scored(hit) => hit.into_search_result(),
            PatientHit::Plain(raw) => PatientMatch::from_payload(raw).into_search_result(None),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchContext {
    #[serde(default)]
    pub clinician_data: Value,
    #[serde(default)]
    pub similar_patients: Vec<PatientHit>,
}

/// Every search response layout the backend has shipped.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SearchResponse {
    Matched {
        #[serde(default)]
        answer: Option<String>,
        matched_patients: Vec<PatientHit>,
    },
    Contextual {
        #[serde(default)]
        answer: Option<String>,
        context: SearchContext,
    },
    Similar {
        similar_patients: Vec<PatientHit>,
    },
    Results {
        #[serde(default)]
        answer: Option<String>,
        results: Vec<SearchResult>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub clinician_id: String,
    pub query: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default)]
    pub context: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimilarPatientsRequest {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimilarPatientsResponse {
    #[serde(default)]
    pub similar_patients: Vec<PatientHit>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InsertPatientRequest {
    pub patient_id: String,
    pub text: String,
    pub metadata: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryRequest {
    pub data: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
