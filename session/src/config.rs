//! Configuration for the analysis webhook and normalization.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! webhook:
//!   url: http://localhost:5678/webhook/analyze-client
//!   timeout_secs: 30
//! normalize:
//!   confidence_policy: passthrough
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use coach_analysis_normalizer::NormalizeOptions;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SessionError};

pub const DEFAULT_WEBHOOK_URL: &str = "http://localhost:5678/webhook/analyze-client";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Where and how to reach the analysis webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Endpoint receiving `{"clientId": ...}` POST requests.
    pub url: String,
    /// Whole-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_WEBHOOK_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Top-level coaching analysis configuration.
///
/// # Examples
///
/// ```
/// use coach_analysis_session::CoachConfig;
///
/// let yaml = "version: \"1.0\"\nwebhook:\n  url: https://hooks.example.com/analyze\n";
/// let config: CoachConfig = serde_yaml::from_str(yaml).unwrap();
/// assert_eq!(config.webhook.timeout_secs, 30);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoachConfig {
    /// Configuration format version (e.g., `"1.0"`).
    pub version: String,
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub normalize: NormalizeOptions,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            webhook: WebhookConfig::default(),
            normalize: NormalizeOptions::default(),
        }
    }
}

impl CoachConfig {
    /// Loads and validates configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::SessionError::IoError) if the file cannot
    /// be read, [`YamlError`](crate::SessionError::YamlError) if parsing
    /// fails, or [`InvalidConfig`](crate::SessionError::InvalidConfig) if the
    /// values are unusable.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = serde_yaml::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Checks that the webhook URL is an absolute http(s) URL and the
    /// timeout is non-zero.
    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.webhook.url).map_err(|e| {
            SessionError::InvalidConfig(format!("webhook url '{}': {e}", self.webhook.url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SessionError::InvalidConfig(format!(
                "webhook url '{}' must use http or https",
                self.webhook.url
            )));
        }
        if self.webhook.timeout_secs == 0 {
            return Err(SessionError::InvalidConfig(
                "webhook timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
