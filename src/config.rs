// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{AssistError, Result};
use crate::filter::{SourceToggles, TimeRange};
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub backend: BackendConfig,
    pub search: SearchConfig,
    pub chat: ChatConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub search_path: String,
    pub chat_path: String,
    pub clinician_id: Option<String>,
    pub similarity_threshold: Option<f32>,
    pub api_key: Option<String>,
    /// Unset means requests wait for as long as the backend takes.
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    pub min_query_chars: usize,
    pub min_confidence: f32,
    pub time_range: TimeRange,
    #[serde(default)]
    pub sources: SourceToggles,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatConfig {
    pub greeting: Option<String>,
    pub simulate: bool,
    pub simulated_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub preview_chars: usize,
    pub graph_width: usize,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("CLINICIAN_ASSIST")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| AssistError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| AssistError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            backend: BackendConfig {
                base_url: "http://127.0.0.1:5000".to_string(),
                search_path: "/search".to_string(),
                chat_path: "/chat".to_string(),
                clinician_id: None,
                similarity_threshold: None,
                api_key: None,
                timeout_secs: None,
            },
            search: SearchConfig {
                min_query_chars: 3,
                min_confidence: 80.0,
                time_range: TimeRange::Last24Hours,
                sources: SourceToggles::default(),
            },
            chat: ChatConfig {
                greeting: Some(
                    "Hello! I'm your AI assistant. How can I help you today?".to_string(),
                ),
                simulate: false,
                simulated_delay_ms: 1000,
            },
            output: OutputConfig {
                preview_chars: 300,
                graph_width: 40,
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.backend.base_url.starts_with("http://")
            && !self.backend.base_url.starts_with("https://")
        {
            return Err(AssistError::Config(format!(
                "backend.base_url must be an http(s) URL: {}",
                self.backend.base_url
            )));
        }

        if self.search.min_query_chars == 0 {
            return Err(AssistError::Config(
                "min_query_chars must be greater than 0".to_string(),
            ));
        }

        Validator::validate_confidence(self.search.min_confidence)
            .map_err(|e| AssistError::Config(e.to_string()))?;

        if let Some(threshold) = self.backend.similarity_threshold {
            Validator::validate_similarity_threshold(threshold)
                .map_err(|e| AssistError::Config(e.to_string()))?;
        }

        Ok(())
    }
}
