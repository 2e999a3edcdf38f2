use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AutocompleteError, Result};

pub const DEFAULT_URL: &str = "http://localhost:3000/countries?matching=";
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Widget configuration, optionally loaded from a YAML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutocompleteConfig {
    /// Endpoint prefix; the percent-encoded query is appended verbatim.
    pub url: String,
    pub debounce_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_ms: Option<u64>,
    /// Rendered width of the input line; the overlay is clipped to it.
    pub input_width: u16,
    pub label: String,
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            request_timeout_ms: None,
            input_width: 40,
            label: "Search".to_string(),
        }
    }
}

impl AutocompleteConfig {
    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    /// Missing files fall back to the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents).map_err(|source| AutocompleteError::Config {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_yaml(contents: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents)
    }
}
