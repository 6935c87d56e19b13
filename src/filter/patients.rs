// file: src/filter/patients.rs
// description: text and status filtering for the local patient directory

use crate::error::{AssistError, Result};
use crate::models::{Patient, PatientStatus};
use std::fs;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    pub fn admits(&self, status: PatientStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => status == PatientStatus::Active,
            StatusFilter::Inactive => status == PatientStatus::Inactive,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = AssistError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "inactive" => Ok(StatusFilter::Inactive),
            other => Err(AssistError::Validation(format!(
                "Unknown status filter '{}' (expected all, active or inactive)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PatientQuery {
    pub text: String,
    pub status: StatusFilter,
}

impl PatientQuery {
    pub fn new(text: impl Into<String>, status: StatusFilter) -> Self {
        Self {
            text: text.into(),
            status,
        }
    }

    /// Text matches name, email, id or condition; both text and status must hold.
    pub fn matches(&self, patient: &Patient) -> bool {
        let needle = self.text.trim().to_lowercase();
        let text_match = needle.is_empty()
            || [
                &patient.name,
                &patient.email,
                &patient.id,
                &patient.condition,
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle));

        text_match && self.status.admits(patient.status)
    }

    pub fn apply<'a>(&self, patients: &'a [Patient]) -> Vec<&'a Patient> {
        patients.iter().filter(|p| self.matches(p)).collect()
    }
}

pub fn load_patients(path: &Path) -> Result<Vec<Patient>> {
    let raw = fs::read_to_string(path).map_err(|source| AssistError::FileOperation {
        path: path.to_path_buf(),
        source,
    })?;
    let patients: Vec<Patient> = serde_json::from_str(&raw)?;
    Ok(patients)
}
