// file: src/filter/state.rs
// description: filter state held independently of the fetched results

use crate::error::AssistError;
use crate::models::DataSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceToggles {
    pub ehr: bool,
    pub lab: bool,
    pub imaging: bool,
    pub notes: bool,
}

impl Default for SourceToggles {
    fn default() -> Self {
        Self {
            ehr: true,
            lab: true,
            imaging: true,
            notes: true,
        }
    }
}

impl SourceToggles {
    /// Enables exactly the given sources.
    pub fn only(sources: &[DataSource]) -> Self {
        let mut toggles = Self {
            ehr: false,
            lab: false,
            imaging: false,
            notes: false,
        };
        for source in sources {
            toggles.set(source, true);
        }
        toggles
    }

    /// Sources without a toggle are never hidden.
    pub fn is_enabled(&self, source: &DataSource) -> bool {
        match source {
            DataSource::Ehr => self.ehr,
            DataSource::Lab => self.lab,
            DataSource::Imaging => self.imaging,
            DataSource::Notes => self.notes,
            DataSource::Other(_) => true,
        }
    }

    pub fn set(&mut self, source: &DataSource, enabled: bool) {
        match source {
            DataSource::Ehr => self.ehr = enabled,
            DataSource::Lab => self.lab = enabled,
            DataSource::Imaging => self.imaging = enabled,
            DataSource::Notes => self.notes = enabled,
            DataSource::Other(_) => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "24h")]
    Last24Hours,
    #[serde(rename = "7d")]
    Last7Days,
    #[serde(rename = "30d")]
    Last30Days,
    #[serde(rename = "all")]
    All,
}

impl TimeRange {
    pub fn max_age_hours(&self) -> Option<f64> {
        match self {
            TimeRange::Last24Hours => Some(24.0),
            TimeRange::Last7Days => Some(168.0),
            TimeRange::Last30Days => Some(720.0),
            TimeRange::All => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Last24Hours => "24h",
            TimeRange::Last7Days => "7d",
            TimeRange::Last30Days => "30d",
            TimeRange::All => "all",
        }
    }
}

impl FromStr for TimeRange {
    type Err = AssistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "24h" => Ok(TimeRange::Last24Hours),
            "7d" => Ok(TimeRange::Last7Days),
            "30d" => Ok(TimeRange::Last30Days),
            "all" => Ok(TimeRange::All),
            other => Err(AssistError::Validation(format!(
                "Unknown time range '{}' (expected 24h, 7d, 30d or all)",
                other
            ))),
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub sources: SourceToggles,
    pub time_range: TimeRange,
    /// Minimum confidence on the 0-100 scale
    pub min_confidence: f32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            sources: SourceToggles::default(),
            time_range: TimeRange::Last24Hours,
            min_confidence: 80.0,
        }
    }
}

impl FilterState {
    pub fn new(sources: SourceToggles, time_range: TimeRange, min_confidence: f32) -> Self {
        Self {
            sources,
            time_range,
            min_confidence,
        }
    }

    pub fn toggle_source(&mut self, source: &DataSource, enabled: bool) {
        self.sources.set(source, enabled);
    }

    pub fn set_time_range(&mut self, time_range: TimeRange) {
        self.time_range = time_range;
    }

    pub fn set_min_confidence(&mut self, min_confidence: f32) {
        self.min_confidence = min_confidence.clamp(0.0, 100.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_enables_listed_sources() {
        let toggles = SourceToggles::only(&[DataSource::Lab, DataSource::Notes]);
        assert!(!toggles.is_enabled(&DataSource::Ehr));
        assert!(toggles.is_enabled(&DataSource::Lab));
        assert!(!toggles.is_enabled(&DataSource::Imaging));
        assert!(toggles.is_enabled(&DataSource::Notes));
        assert!(toggles.is_enabled(&DataSource::Other("Wearables".to_string())));
    }

    #[test]
    fn test_time_range_parsing() {
        assert_eq!("7D".parse::<TimeRange>().unwrap(), TimeRange::Last7Days);
        assert_eq!("all".parse::<TimeRange>().unwrap(), TimeRange::All);
        assert!("1y".parse::<TimeRange>().is_err());
        assert_eq!(TimeRange::Last30Days.max_age_hours(), Some(720.0));
    }

    #[test]
    fn test_confidence_is_clamped() {
        let mut state = FilterState::default();
        state.set_min_confidence(250.0);
        assert_eq!(state.min_confidence, 100.0);
        state.toggle_source(&DataSource::Imaging, false);
        assert!(!state.sources.imaging);
    }
}
