use webbridge_core::BridgeConfig;

/// Options for creating a bridged WebView.
#[derive(Debug, Clone)]
pub struct WebViewOptions {
    /// Whether the WebView background should be transparent.
    pub transparent: bool,
    /// Whether to enable dev tools.
    pub devtools: bool,
    /// Custom user agent string.
    pub user_agent: Option<String>,
    /// Whether to enable clipboard access.
    pub clipboard: bool,
    /// Whether to enable autoplay for media.
    pub autoplay: bool,
}

impl Default for WebViewOptions {
    fn default() -> Self {
        Self {
            transparent: false,
            devtools: cfg!(debug_assertions),
            user_agent: None,
            clipboard: true,
            autoplay: true,
        }
    }
}

impl WebViewOptions {
    /// Derive options from a bridge config.
    pub fn from_config(config: &BridgeConfig) -> Self {
        Self {
            devtools: config.devtools,
            user_agent: config.user_agent.clone(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_carries_agent_and_devtools() {
        let config = BridgeConfig {
            user_agent: Some("Demo/1.0".into()),
            devtools: true,
            ..Default::default()
        };
        let options = WebViewOptions::from_config(&config);
        assert_eq!(options.user_agent.as_deref(), Some("Demo/1.0"));
        assert!(options.devtools);
        assert!(options.clipboard);
    }
}
