// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod backend;
pub mod chat;
pub mod config;
pub mod error;
pub mod exporter;
pub mod filter;
pub mod models;
pub mod notify;
pub mod render;
pub mod search;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

pub use backend::{AssistantBackend, BackendClient, ChatRequest, ChatResponse, SearchRequest, SearchResponse};
pub use chat::{BackendResponder, ChatResponder, ChatSession, SendOutcome, SimulatedResponder};
pub use config::{BackendConfig, ChatConfig, Config, OutputConfig, SearchConfig};
pub use error::{AssistError, Result};
pub use exporter::{ExportManifest, ExportedResults, JsonExporter};
pub use filter::{FilterState, PatientQuery, SourceToggles, StatusFilter, TimeRange, apply_filters};
pub use models::{ChatMessage, DataSource, Patient, Role, SearchResult, SuggestedAction};
pub use notify::{Notification, NotificationCenter, NotificationLevel};
pub use render::ViewMode;
pub use search::{DispatchOutcome, QueryDispatcher, SearchBatch};
pub use utils::{HealthCheck, HealthReport, HealthStatus, OperationTimer, RequestSpinner, Validator};
