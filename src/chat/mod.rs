// file: src/chat/mod.rs
// description: chat session module exports

pub mod responder;
pub mod session;

pub use responder::{BackendResponder, ChatResponder, SimulatedResponder, describe_context};
pub use session::{ChatSession, GENERIC_ERROR_REPLY, SendOutcome};
