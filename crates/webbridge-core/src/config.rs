//! Bridge configuration.
//!
//! All fields default so a partial (or absent) config works out of the box.

use serde::{Deserialize, Serialize};
use webbridge_common::ConfigError;

/// Static configuration for one bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Diagnostic tag handed to the native core at init.
    pub tag: String,
    /// Reserved URL scheme resolved by the native core.
    pub scheme: String,
    /// Launch parameters forwarded to the native core at init.
    pub launch_params: Vec<String>,
    /// User agent override for the surface, if any.
    pub user_agent: Option<String>,
    /// Whether the surface should expose devtools.
    pub devtools: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            tag: "webbridge".to_string(),
            scheme: "embedded".to_string(),
            launch_params: Vec::new(),
            user_agent: None,
            devtools: cfg!(debug_assertions),
        }
    }
}

impl BridgeConfig {
    /// Parse from TOML text and validate.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(text).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tag.is_empty() {
            return Err(ConfigError::ValidationError("tag is empty".into()));
        }
        if self.scheme.is_empty() {
            return Err(ConfigError::ValidationError("scheme is empty".into()));
        }
        let mut chars = self.scheme.chars();
        let first = chars.next().unwrap_or(' ');
        if !first.is_ascii_lowercase()
            || !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(ConfigError::ValidationError(format!(
                "scheme '{}' must be lowercase ASCII starting with a letter",
                self.scheme
            )));
        }
        Ok(())
    }
}
