// file: src/test_support.rs
// description: scripted backend used by dispatcher and chat session tests

use crate::backend::{AssistantBackend, ChatRequest, ChatResponse, SearchRequest, SearchResponse};
use crate::error::{AssistError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

lazy_static! {
    static ref ANSI_ESCAPE: Regex = Regex::new(r"\x1b\[[0-9;]*m").unwrap();
}

/// Drops terminal colour codes so assertions hold with or without colour.
pub fn plain(rendered: &str) -> String {
    ANSI_ESCAPE.replace_all(rendered, "").into_owned()
}

/// Replies keyed by query text. A `None` body makes the call fail.
#[derive(Default)]
pub struct StubBackend {
    search_replies: HashMap<String, (Duration, Option<Value>)>,
    chat_reply: Option<Value>,
    pub search_calls: AtomicUsize,
    pub chat_calls: AtomicUsize,
    pub last_search: Mutex<Option<SearchRequest>>,
}

impl StubBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_ok(mut self, query: &str, body: Value) -> Self {
        self.search_replies
            .insert(query.to_string(), (Duration::ZERO, Some(body)));
        self
    }

    pub fn search_delayed(mut self, query: &str, delay: Duration, body: Value) -> Self {
        self.search_replies
            .insert(query.to_string(), (delay, Some(body)));
        self
    }

    pub fn search_fails(mut self, query: &str) -> Self {
        self.search_replies
            .insert(query.to_string(), (Duration::ZERO, None));
        self
    }

    pub fn chat_ok(mut self, body: Value) -> Self {
        self.chat_reply = Some(body);
        self
    }
}

impl AssistantBackend for StubBackend {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_search.lock() {
            *last = Some(request.clone());
        }

        let (delay, body) = self
            .search_replies
            .get(&request.query)
            .cloned()
            .unwrap_or((Duration::ZERO, None));

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match body {
            Some(body) => Ok(serde_json::from_value(body)?),
            None => Err(AssistError::Http("connection refused".to_string())),
        }
    }

    async fn chat(&self, _request: &ChatRequest) -> Result<ChatResponse> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        match &self.chat_reply {
            Some(body) => Ok(serde_json::from_value(body.clone())?),
            None => Err(AssistError::BackendStatus {
                status: 500,
                body: "internal error".to_string(),
            }),
        }
    }
}
