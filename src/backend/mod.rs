// file: src/backend/mod.rs
// description: assistant backend client module exports

pub mod client;
pub mod wire;

pub use client::{AssistantBackend, BackendClient};
pub use wire::{ChatRequest, ChatResponse, PatientHit, SearchContext, SearchRequest, SearchResponse};
