// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod chat;
pub mod deserializers;
pub mod patient;
pub mod search_result;
pub mod source;

pub use chat::{ChatMessage, Role, SuggestedAction};
pub use patient::{Patient, PatientMatch, PatientStatus, ScoredPatient};
pub use search_result::{RelatedData, SearchResult, TrendPoint, normalize_confidence, parse_timestamp};
pub use source::DataSource;
