use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::caption::CaptionWeights;
use crate::scoring::ViralityWeights;

pub const DEFAULT_SENTIMENT_MODEL: &str = "cardiffnlp/twitter-roberta-base-sentiment-latest";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub endpoint: String,
    pub model: String,
    pub timeout_ms: u64,
    /// Read from `CLASSIFIER_API_TOKEN` only; never written to disk.
    #[serde(skip)]
    pub api_token: Option<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api-inference.huggingface.co/models".to_string(),
            model: DEFAULT_SENTIMENT_MODEL.to_string(),
            timeout_ms: 5000,
            api_token: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: ViralityWeights,
    pub caption: CaptionWeights,
    pub classifier: ClassifierConfig,
}

impl ScoringConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), String> {
        let config_path = path.or_else(default_config_path);
        let mut config = if let Some(path) = config_path.as_ref() {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading scoring config");
                let contents = std::fs::read_to_string(path)
                    .map_err(|err| format!("failed to read config: {}", err))?;
                Self::from_toml(&contents)?
            } else {
                tracing::debug!(path = %path.display(), "config not found, using defaults");
                ScoringConfig::default()
            }
        } else {
            ScoringConfig::default()
        };

        config.apply_env_overrides();
        Ok((config, config_path))
    }

    pub fn from_toml(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|err| format!("failed to parse config: {}", err))
    }

    pub fn write(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|err| format!("failed to create config dir: {}", err))?;
            }
        }
        let payload = toml::to_string_pretty(self)
            .map_err(|err| format!("failed to serialize config: {}", err))?;
        std::fs::write(path, payload)
            .map_err(|err| format!("failed to write config: {}", err))?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(endpoint) = env::var("CLASSIFIER_ENDPOINT") {
            if !endpoint.trim().is_empty() {
                self.classifier.endpoint = endpoint;
            }
        }
        if let Ok(model) = env::var("CLASSIFIER_MODEL") {
            if !model.trim().is_empty() {
                self.classifier.model = model;
            }
        }
        if let Ok(timeout) = env::var("CLASSIFIER_TIMEOUT_MS") {
            if let Ok(value) = timeout.parse::<u64>() {
                self.classifier.timeout_ms = value;
            }
        }
        if let Ok(token) = env::var("CLASSIFIER_API_TOKEN") {
            if !token.trim().is_empty() {
                self.classifier.api_token = Some(token);
            }
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    env::var("SCORING_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/scoring.toml")))
}
