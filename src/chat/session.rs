// file: src/chat/session.rs
// description: append-only chat transcript driven by a responder

use super::responder::ChatResponder;
use crate::models::ChatMessage;
use tracing::debug;

pub const GENERIC_ERROR_REPLY: &str =
    "Sorry, I couldn't process your request right now. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input; the transcript is unchanged.
    Ignored,
    Replied { appended: usize },
    Failed,
}

pub struct ChatSession<R> {
    responder: R,
    clinician_id: String,
    messages: Vec<ChatMessage>,
}

impl<R: ChatResponder> ChatSession<R> {
    pub fn new(responder: R, clinician_id: impl Into<String>) -> Self {
        Self {
            responder,
            clinician_id: clinician_id.into(),
            messages: Vec::new(),
        }
    }

    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.messages.push(ChatMessage::assistant(greeting));
        self
    }

    /// Appends the user's message, waits for the responder, then appends its
    /// replies or a single generic error message.
    pub async fn send(&mut self, input: &str) -> SendOutcome {
        if input.trim().is_empty() {
            return SendOutcome::Ignored;
        }

        self.messages.push(ChatMessage::user(input));

        match self.responder.respond(&self.clinician_id, input).await {
            Ok(replies) => {
                let appended = replies.len();
                debug!("Responder produced {} messages", appended);
                self.messages.extend(replies);
                SendOutcome::Replied { appended }
            }
            Err(e) => {
                debug!("Chat request failed: {}", e);
                self.messages.push(ChatMessage::assistant(GENERIC_ERROR_REPLY));
                SendOutcome::Failed
            }
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
