// file: src/models/source.rs
// description: data source labels attached to search results

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataSource {
    Ehr,
    Lab,
    Imaging,
    Notes,
    Other(String),
}

impl DataSource {
    pub const KNOWN: [DataSource; 4] = [
        DataSource::Ehr,
        DataSource::Lab,
        DataSource::Imaging,
        DataSource::Notes,
    ];

    pub fn label(&self) -> &str {
        match self {
            DataSource::Ehr => "Electronic Health Records",
            DataSource::Lab => "Lab Results Database",
            DataSource::Imaging => "Imaging Database",
            DataSource::Notes => "Clinical Notes",
            DataSource::Other(label) => label,
        }
    }

    /// Short key used on the command line and in config files
    pub fn key(&self) -> Option<&'static str> {
        match self {
            DataSource::Ehr => Some("ehr"),
            DataSource::Lab => Some("lab"),
            DataSource::Imaging => Some("imaging"),
            DataSource::Notes => Some("notes"),
            DataSource::Other(_) => None,
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_ascii_lowercase();
        let key = if key == "labs" { "lab" } else { key.as_str() };
        Self::KNOWN
            .into_iter()
            .find(|source| source.key() == Some(key))
    }

    /// Comma separated list of the keys `from_key` accepts
    pub fn known_keys() -> String {
        Self::KNOWN
            .iter()
            .filter_map(DataSource::key)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl From<String> for DataSource {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Electronic Health Records" => DataSource::Ehr,
            "Lab Results Database" => DataSource::Lab,
            "Imaging Database" => DataSource::Imaging,
            "Clinical Notes" => DataSource::Notes,
            _ => DataSource::Other(label),
        }
    }
}

impl From<DataSource> for String {
    fn from(source: DataSource) -> Self {
        match source {
            DataSource::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_round_trip() {
        for source in DataSource::KNOWN {
            assert_eq!(DataSource::from(source.label().to_string()), source);
        }
    }

    #[test]
    fn test_unknown_label_is_preserved() {
        let source = DataSource::from("Pharmacy Feed".to_string());
        assert_eq!(source, DataSource::Other("Pharmacy Feed".to_string()));
        assert_eq!(source.key(), None);
        assert_eq!(String::from(source), "Pharmacy Feed");
    }

    #[test]
    fn test_from_key() {
        assert_eq!(DataSource::from_key("EHR"), Some(DataSource::Ehr));
        assert_eq!(DataSource::from_key("labs"), Some(DataSource::Lab));
        assert_eq!(DataSource::from_key(" Notes "), Some(DataSource::Notes));
        assert_eq!(DataSource::from_key("radiology"), None);
        assert_eq!(DataSource::known_keys(), "ehr, lab, imaging, notes");
    }
}
