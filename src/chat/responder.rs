// file: src/chat/responder.rs
// description: sources of assistant replies for a chat session

use crate::backend::{AssistantBackend, ChatRequest};
use crate::error::Result;
use crate::models::{ChatMessage, SuggestedAction};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const CONTEXT_SOURCE: &str = "Clinician context";

pub trait ChatResponder: Send + Sync {
    /// Produces the assistant messages answering `query`, in display order.
    fn respond(
        &self,
        clinician_id: &str,
        query: &str,
    ) -> impl Future<Output = Result<Vec<ChatMessage>>> + Send;
}

/// Canned reply after a fixed delay, for demos and offline use.
#[derive(Debug, Clone)]
pub struct SimulatedResponder {
    delay: Duration,
    reply: String,
    actions: Vec<SuggestedAction>,
}

impl SimulatedResponder {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            reply: "I've analyzed your request. Here are some suggested actions we can take:"
                .to_string(),
            actions: vec![
                SuggestedAction::new("Schedule Appointment", "schedule"),
                SuggestedAction::new("View Patient Records", "records"),
            ],
        }
    }
}

impl ChatResponder for SimulatedResponder {
    async fn respond(&self, _clinician_id: &str, _query: &str) -> Result<Vec<ChatMessage>> {
        tokio::time::sleep(self.delay).await;
        Ok(vec![
            ChatMessage::assistant(self.reply.clone()).with_actions(self.actions.clone()),
        ])
    }
}

/// Forwards each message to the backend chat endpoint.
pub struct BackendResponder<B> {
    backend: Arc<B>,
}

impl<B> BackendResponder<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }
}

impl<B: AssistantBackend> ChatResponder for BackendResponder<B> {
    async fn respond(&self, clinician_id: &str, query: &str) -> Result<Vec<ChatMessage>> {
        let request = ChatRequest {
            clinician_id: clinician_id.to_string(),
            query: query.trim().to_string(),
        };
        let response = self.backend.chat(&request).await?;

        let mut messages = vec![ChatMessage::assistant(response.response)];
        if let Some(summary) = describe_context(&response.context) {
            debug!("Chat response carried context ({} chars)", summary.len());
            messages.push(
                ChatMessage::assistant(format!("Context: {}", summary)).with_source(CONTEXT_SOURCE),
            );
        }
        Ok(messages)
    }
}

/// One-line rendering of the backend's context value; `None` when empty.
pub fn describe_context(context: &Value) -> Option<String> {
    match context {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.trim().to_string()),
        Value::Array(items) if items.is_empty() => None,
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("; "),
        ),
        Value::Object(map) if map.is_empty() => None,
        other => Some(other.to_string()),
    }
}
