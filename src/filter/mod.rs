// file: src/filter/mod.rs
// description: result and patient filtering module exports

pub mod apply;
pub mod patients;
pub mod state;

pub use apply::{apply_filters, matches};
pub use patients::{PatientQuery, StatusFilter, load_patients};
pub use state::{FilterState, SourceToggles, TimeRange};
