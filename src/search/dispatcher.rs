// file: src/search/dispatcher.rs
// description: sends free-text queries to the search endpoint and holds the latest results

use super::batch::SearchBatch;
use crate::backend::{AssistantBackend, SearchRequest, SearchResponse};
use crate::config::Config;
use crate::error::Result;
use crate::models::SearchResult;
use crate::notify::{Notification, NotificationCenter};
use crate::utils::Validator;
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Query too short; nothing was sent.
    Skipped,
    Updated { count: usize },
    Failed,
}

pub struct QueryDispatcher<B> {
    backend: Arc<B>,
    min_query_chars: usize,
    clinician_id: Option<String>,
    similarity_threshold: Option<f32>,
    batch: Option<SearchBatch>,
    notifications: NotificationCenter,
}

impl<B: AssistantBackend> QueryDispatcher<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            min_query_chars: 3,
            clinician_id: None,
            similarity_threshold: None,
            batch: None,
            notifications: NotificationCenter::new(),
        }
    }

    pub fn from_config(backend: Arc<B>, config: &Config) -> Self {
        Self {
            min_query_chars: config.search.min_query_chars,
            clinician_id: config.backend.clinician_id.clone(),
            similarity_threshold: config.backend.similarity_threshold,
            ..Self::new(backend)
        }
    }

    pub fn with_clinician(mut self, clinician_id: impl Into<String>) -> Self {
        self.clinician_id = Some(clinician_id.into());
        self
    }

    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = Some(threshold);
        self
    }

    /// Returns `None` when the trimmed query is shorter than the minimum.
    pub fn prepare(&self, query: &str) -> Option<SearchRequest> {
        if !Validator::meets_min_length(query, self.min_query_chars) {
            debug!("Ignoring short query ({} chars)", query.trim().chars().count());
            return None;
        }

        Some(SearchRequest {
            query: Validator::collapse_whitespace(query),
            clinician_id: self.clinician_id.clone(),
            similarity_threshold: self.similarity_threshold,
        })
    }

    /// Installs a response, or records exactly one error notification and
    /// keeps the previous results.
    pub fn apply(&mut self, query: &str, outcome: Result<SearchResponse>) -> DispatchOutcome {
        match outcome {
            Ok(response) => {
                let batch = SearchBatch::from_response(query, response);
                let count = batch.len();
                info!("Search for \"{}\" returned {} results", query, count);
                self.notifications.push(Notification::info(
                    "Searching...",
                    format!("Found {} results for \"{}\"", count, query),
                ));
                self.batch = Some(batch);
                DispatchOutcome::Updated { count }
            }
            Err(e) => {
                debug!("Search for \"{}\" failed: {}", query, e);
                self.notifications
                    .push(Notification::error("Search failed", e.to_string()));
                DispatchOutcome::Failed
            }
        }
    }

    pub async fn dispatch(&mut self, query: &str) -> DispatchOutcome {
        let Some(request) = self.prepare(query) else {
            return DispatchOutcome::Skipped;
        };

        let outcome = self.backend.search(&request).await;
        self.apply(&request.query, outcome)
    }

    /// Sends every query at once and applies responses as they arrive, so the
    /// slowest response decides the final result set. Outcomes are returned
    /// in arrival order; skipped queries come first.
    pub async fn dispatch_all(&mut self, queries: &[String]) -> Vec<(String, DispatchOutcome)> {
        let mut outcomes = Vec::with_capacity(queries.len());
        let mut in_flight = FuturesUnordered::new();

        for query in queries {
            match self.prepare(query) {
                Some(request) => {
                    let backend = Arc::clone(&self.backend);
                    in_flight.push(async move {
                        let response = backend.search(&request).await;
                        (request.query, response)
                    });
                }
                None => outcomes.push((query.clone(), DispatchOutcome::Skipped)),
            }
        }

        if in_flight.len() > 1 {
            warn!(
                "{} searches in flight; the last response to arrive wins",
                in_flight.len()
            );
        }

        while let Some((query, response)) = in_flight.next().await {
            let outcome = self.apply(&query, response);
            outcomes.push((query, outcome));
        }

        outcomes
    }

    pub fn results(&self) -> &[SearchResult] {
        self.batch
            .as_ref()
            .map(|b| b.results.as_slice())
            .unwrap_or(&[])
    }

    pub fn batch(&self) -> Option<&SearchBatch> {
        self.batch.as_ref()
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotificationLevel;
    use crate::test_support::StubBackend;
    use serde_json::json;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn two_matches() -> serde_json::Value {
        json!({
            "answer": "Two diabetic patients found",
            "matched_patients": [
                { "id": 1, "diagnosis": "Diabetes", "age": 34 },
                { "id": 2, "diagnosis": "Diabetes", "age": 38 }
            ]
        })
    }

    #[tokio::test]
    async fn test_short_query_is_a_no_op() {
        let backend = Arc::new(StubBackend::new());
        let mut dispatcher = QueryDispatcher::new(Arc::clone(&backend));

        assert_eq!(dispatcher.dispatch("ab").await, DispatchOutcome::Skipped);
        assert_eq!(dispatcher.dispatch("   x  ").await, DispatchOutcome::Skipped);
        assert_eq!(backend.search_calls.load(Ordering::SeqCst), 0);
        assert!(dispatcher.notifications().pending().is_empty());
    }

    #[tokio::test]
    async fn test_success_replaces_results() {
        let backend = Arc::new(
            StubBackend::new()
                .search_ok("diabetic patients", two_matches())
                .search_ok("asthma", json!({ "matched_patients": [{ "id": 9 }] })),
        );
        let mut dispatcher = QueryDispatcher::new(backend);

        assert_eq!(
            dispatcher.dispatch("diabetic   patients").await,
            DispatchOutcome::Updated { count: 2 }
        );
        assert_eq!(
            dispatcher.batch().unwrap().answer.as_deref(),
            Some("Two diabetic patients found")
        );

        dispatcher.dispatch("asthma").await;
        assert_eq!(dispatcher.results().len(), 1);
        assert_eq!(dispatcher.results()[0].id, "9");
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_results_and_notifies_once() {
        let backend = Arc::new(
            StubBackend::new()
                .search_ok("diabetic patients", two_matches())
                .search_fails("broken query"),
        );
        let mut dispatcher = QueryDispatcher::new(backend);

        dispatcher.dispatch("diabetic patients").await;
        dispatcher.take_notifications();

        assert_eq!(dispatcher.dispatch("broken query").await, DispatchOutcome::Failed);
        assert_eq!(dispatcher.results().len(), 2);
        assert_eq!(dispatcher.batch().unwrap().query, "diabetic patients");

        let notifications = dispatcher.take_notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].level, NotificationLevel::Error);
    }

    #[tokio::test]
    async fn test_failed_first_search_reports_only_through_notification() {
        let backend = Arc::new(StubBackend::new().search_fails("diabetic patients"));
        let mut dispatcher = QueryDispatcher::new(backend);

        let outcomes = dispatcher
            .dispatch_all(&["diabetic patients".to_string()])
            .await;
        assert_eq!(outcomes, vec![("diabetic patients".to_string(), DispatchOutcome::Failed)]);
        assert!(dispatcher.batch().is_none());
        assert!(dispatcher.results().is_empty());

        let notifications = dispatcher.take_notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].title, "Search failed");
        assert!(dispatcher.take_notifications().is_empty());
    }

    #[tokio::test]
    async fn test_backend_error_status_yields_one_error_notification() {
        use crate::backend::BackendClient;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({ "error": "index unavailable" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut config = Config::default_config();
        config.backend.base_url = server.uri();
        let client = Arc::new(BackendClient::new(&config.backend).unwrap());
        let mut dispatcher = QueryDispatcher::from_config(client, &config);

        assert_eq!(
            dispatcher.dispatch("diabetic patients").await,
            DispatchOutcome::Failed
        );

        let notifications = dispatcher.take_notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].level, NotificationLevel::Error);
        assert!(notifications[0].description.contains("index unavailable"));
    }

    #[tokio::test]
    async fn test_request_carries_clinician_and_threshold() {
        let backend = Arc::new(StubBackend::new().search_ok("chest pain", two_matches()));
        let mut dispatcher = QueryDispatcher::new(Arc::clone(&backend))
            .with_clinician("clin-7")
            .with_similarity_threshold(0.6);

        dispatcher.dispatch("chest pain").await;

        let sent = backend.last_search.lock().unwrap().clone().unwrap();
        assert_eq!(sent.clinician_id.as_deref(), Some("clin-7"));
        assert_eq!(sent.similarity_threshold, Some(0.6));
    }

    #[tokio::test]
    async fn test_overlapping_searches_last_arrival_wins() {
        let backend = Arc::new(
            StubBackend::new()
                .search_delayed("slow query", Duration::from_millis(80), two_matches())
                .search_delayed(
                    "fast query",
                    Duration::from_millis(5),
                    json!({ "matched_patients": [{ "id": 9 }] }),
                ),
        );
        let mut dispatcher = QueryDispatcher::new(backend);

        let outcomes = dispatcher
            .dispatch_all(&[
                "slow query".to_string(),
                "fast query".to_string(),
                "no".to_string(),
            ])
            .await;

        let order: Vec<&str> = outcomes.iter().map(|(q, _)| q.as_str()).collect();
        assert_eq!(order, vec!["no", "fast query", "slow query"]);
        assert_eq!(dispatcher.batch().unwrap().query, "slow query");
        assert_eq!(dispatcher.results().len(), 2);
    }
}
