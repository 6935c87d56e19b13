// file: src/search/mod.rs
// description: query dispatch and result set module exports

pub mod batch;
pub mod dispatcher;

pub use batch::SearchBatch;
pub use dispatcher::{DispatchOutcome, QueryDispatcher};
