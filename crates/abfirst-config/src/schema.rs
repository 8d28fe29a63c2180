//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ab_tests: AbTestsSettings,

    #[serde(default)]
    pub content: ContentConfig,
}

/// Connection settings for the assignment service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbTestsSettings {
    /// Base URL of the service, e.g. `https://ab.example.com`.
    #[serde(default)]
    pub host: String,

    /// Bearer token sent with every request.
    #[serde(default)]
    pub api_token: String,
}

impl AbTestsSettings {
    pub fn new(host: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            api_token: api_token.into(),
        }
    }

    /// Fail unless both the host and the token are set.
    pub fn require(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::MissingField("ab_tests.host".to_string()));
        }
        if self.api_token.trim().is_empty() {
            return Err(ConfigError::MissingField("ab_tests.api_token".to_string()));
        }
        Ok(())
    }

    /// Host without trailing slashes, ready for joining endpoint paths.
    pub fn base_url(&self) -> &str {
        self.host.trim().trim_end_matches('/')
    }
}

/// Content handling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Node type names searched for tests on top of each format's defaults.
    #[serde(default)]
    pub extra_block_names: Vec<String>,

    /// Recorded next to the cookie hash in decorated responses.
    #[serde(default = "default_origin")]
    pub origin: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            extra_block_names: Vec::new(),
            origin: default_origin(),
        }
    }
}

fn default_origin() -> String {
    "ab-first".to_string()
}
