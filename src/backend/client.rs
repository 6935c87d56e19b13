// file: src/backend/client.rs
// description: HTTP client for the clinician assistant backend
// reference: https://docs.rs/reqwest

use super::wire::{
    ChatRequest, ChatResponse, ErrorBody, InsertPatientRequest, MessageResponse, PatientHit,
    SearchRequest, SearchResponse, SimilarPatientsRequest, SimilarPatientsResponse,
    SummaryRequest, SummaryResponse,
};
use crate::config::BackendConfig;
use crate::error::{AssistError, Result};
use crate::models::SearchResult;
use crate::utils::{OperationTimer, Validator};
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

const SLOW_REQUEST: Duration = Duration::from_secs(5);

/// The two calls the dispatcher and the chat session depend on.
pub trait AssistantBackend: Send + Sync {
    fn search(
        &self,
        request: &SearchRequest,
    ) -> impl Future<Output = Result<SearchResponse>> + Send;

    fn chat(&self, request: &ChatRequest) -> impl Future<Output = Result<ChatResponse>> + Send;
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    search_path: String,
    chat_path: String,
    api_key: Option<String>,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        Validator::validate_url(&config.base_url)?;

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| AssistError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            search_path: config.search_path.clone(),
            chat_path: config.chat_path.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("Authorization", format!("Bearer {}", key)),
            None => request,
        }
    }

    async fn post_json<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = self.endpoint(path);
        let timer = OperationTimer::new(&format!("POST {}", path));

        let response = self
            .authorize(self.client.post(&url))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| AssistError::Http(format!("Failed to send request to {}: {}", url, e)))?;

        let response = Self::check_status(response).await?;
        timer.warn_if_slow(SLOW_REQUEST);

        let parsed = response.json::<Resp>().await.map_err(|e| {
            AssistError::Decode(format!("Unexpected response from {}: {}", path, e))
        })?;
        timer.finish();
        Ok(parsed)
    }

    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let raw = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let body = serde_json::from_str::<ErrorBody>(&raw)
            .map(|e| e.error)
            .unwrap_or(raw);

        debug!("Backend returned {}: {}", status, body);
        Err(AssistError::BackendStatus {
            status: status.as_u16(),
            body,
        })
    }

    /// `GET /` returns the backend's greeting text.
    pub async fn ping(&self) -> Result<String> {
        let url = self.endpoint("/");
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| AssistError::Http(format!("Failed to reach {}: {}", url, e)))?;
        let response = Self::check_status(response).await?;
        Ok(response.text().await?)
    }

    pub async fn search_similar(&self, text: &str) -> Result<Vec<SearchResult>> {
        Validator::validate_content_not_empty(text)?;
        let request = SimilarPatientsRequest {
            text: text.to_string(),
        };
        let response: SimilarPatientsResponse =
            self.post_json("/search_similar_patients", &request).await?;
        debug!("Received {} similar patients", response.similar_patients.len());

        Ok(response
            .similar_patients
            .into_iter()
            .map(PatientHit::into_search_result)
            .collect())
    }

    pub async fn insert_patient(
        &self,
        patient_id: &str,
        text: &str,
        metadata: Value,
    ) -> Result<String> {
        Validator::validate_content_not_empty(patient_id)?;
        Validator::validate_content_not_empty(text)?;
        let request = InsertPatientRequest {
            patient_id: patient_id.to_string(),
            text: text.to_string(),
            metadata,
        };
        let response: MessageResponse = self.post_json("/insert_patient", &request).await?;
        Ok(response.message)
    }

    pub async fn generate_summary(&self, data: Value) -> Result<String> {
        let request = SummaryRequest { data };
        let response: SummaryResponse = self.post_json("/generate_summary", &request).await?;
        Ok(response.summary)
    }
}

impl AssistantBackend for BackendClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        debug!("Searching backend for {} chars", request.query.len());
        self.post_json(&self.search_path, request).await
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        debug!("Sending chat message for clinician {}", request.clinician_id);
        self.post_json(&self.chat_path, request).await
    }
}
