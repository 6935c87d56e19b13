// file: src/exporter/json.rs
// description: json export of displayed search results

use crate::error::{AssistError, Result};
use crate::filter::FilterState;
use crate::models::SearchResult;
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_dir: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct ExportedResults<'a> {
    pub query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<&'a str>,
    pub filters: &'a FilterState,
    pub results: &'a [&'a SearchResult],
}

#[derive(Debug, Serialize)]
pub struct ExportManifest {
    pub exported_at: String,
    pub query: String,
    pub total_results: usize,
    pub files: Vec<String>,
}

impl JsonExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir).map_err(|source| AssistError::FileOperation {
            path: output_dir.clone(),
            source,
        })?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes `results-<timestamp>.json` and `manifest.json`.
    pub fn export_results(
        &self,
        export: &ExportedResults<'_>,
        pretty: bool,
    ) -> Result<ExportManifest> {
        let exported_at = Utc::now();
        let file_name = format!("results-{}.json", exported_at.format("%Y%m%dT%H%M%S%3f"));

        self.write_json(&file_name, export, pretty)?;

        let manifest = ExportManifest {
            exported_at: exported_at.to_rfc3339(),
            query: export.query.to_string(),
            total_results: export.results.len(),
            files: vec![file_name],
        };
        self.write_json("manifest.json", &manifest, pretty)?;

        info!(
            "Exported {} results to {}",
            manifest.total_results,
            self.output_dir.display()
        );
        Ok(manifest)
    }

    fn write_json<T: Serialize + ?Sized>(&self, file_name: &str, value: &T, pretty: bool) -> Result<()> {
        let body = if pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };

        let path = self.output_dir.join(file_name);
        fs::write(&path, body).map_err(|source| AssistError::FileOperation { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DataSource;
    use serde_json::Value;
    use tempfile::tempdir;

    #[test]
    fn test_exporter_creates_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("exports/today");
        let exporter = JsonExporter::new(&nested).unwrap();
        assert!(exporter.output_dir().is_dir());
    }

    #[test]
    fn test_export_writes_results_and_manifest() {
        let dir = tempdir().unwrap();
        let exporter = JsonExporter::new(dir.path()).unwrap();
        let result = SearchResult::new(
            "1",
            "Urgent Lab Results",
            "Potassium elevated",
            DataSource::Lab,
            88.0,
            "2024-02-24T10:30:00",
        );
        let filters = FilterState::default();
        let shown = vec![&result];

        let manifest = exporter
            .export_results(
                &ExportedResults {
                    query: "urgent labs",
                    answer: None,
                    filters: &filters,
                    results: &shown,
                },
                true,
            )
            .unwrap();

        assert_eq!(manifest.total_results, 1);
        let written = fs::read_to_string(dir.path().join(&manifest.files[0])).unwrap();
        let json: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(json["query"], "urgent labs");
        assert_eq!(json["results"][0]["source"], "Lab Results Database");
        assert_eq!(json["filters"]["time_range"], "24h");
        assert!(dir.path().join("manifest.json").exists());
    }
}
