// file: src/search/batch.rs
// description: the result set installed from one successful search response

use crate::backend::{PatientHit, SearchResponse};
use crate::models::{SearchResult, normalize_confidence};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct SearchBatch {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinician_context: Option<Value>,
    pub results: Vec<SearchResult>,
    pub fetched_at: DateTime<Utc>,
}

impl SearchBatch {
    pub fn from_response(query: &str, response: SearchResponse) -> Self {
        let (answer, clinician_context, results) = match response {
            SearchResponse::Matched {
                answer,
                matched_patients,
            } => (answer, None, rows(matched_patients)),
            SearchResponse::Contextual { answer, context } => {
                let clinician = match context.clinician_data {
                    Value::Null => None,
                    data => Some(data),
                };
                (answer, clinician, rows(context.similar_patients))
            }
            SearchResponse::Similar { similar_patients } => (None, None, rows(similar_patients)),
            SearchResponse::Results { answer, results } => {
                let results = results
                    .into_iter()
                    .map(|mut result| {
                        result.confidence_score = normalize_confidence(result.confidence_score);
                        result
                    })
                    .collect();
                (answer, None, results)
            }
        };

        Self {
            query: query.to_string(),
            answer: answer.filter(|a| !a.trim().is_empty()),
            clinician_context,
            results,
            fetched_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

fn rows(hits: Vec<PatientHit>) -> Vec<SearchResult> {
    hits.into_iter().map(PatientHit::into_search_result).collect()
}
