#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("navigation error: {0}")]
    Navigation(String),

    #[error("script error: {0}")]
    Script(String),

    #[error("binding error: {0}")]
    Binding(String),

    #[error("settings error: {0}")]
    Settings(String),

    #[error("surface detached")]
    Detached,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("bridge is not connected")]
    Disconnected,

    #[error("dispatch error: {0}")]
    Dispatch(String),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_error_display() {
        let err = SurfaceError::Navigation("load refused".into());
        assert_eq!(err.to_string(), "navigation error: load refused");

        let err = SurfaceError::Script("eval failed".into());
        assert_eq!(err.to_string(), "script error: eval failed");

        let err = SurfaceError::Binding("duplicate symbol".into());
        assert_eq!(err.to_string(), "binding error: duplicate symbol");

        let err = SurfaceError::Detached;
        assert_eq!(err.to_string(), "surface detached");
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("scheme is empty".into());
        assert_eq!(
            err.to_string(),
            "config validation error: scheme is empty"
        );
    }

    #[test]
    fn bridge_error_from_surface() {
        let surface_err = SurfaceError::Script("syntax error".into());
        let bridge_err: BridgeError = surface_err.into();
        assert!(matches!(bridge_err, BridgeError::Surface(_)));
        assert!(bridge_err.to_string().contains("syntax error"));
    }

    #[test]
    fn bridge_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let bridge_err: BridgeError = config_err.into();
        assert!(matches!(bridge_err, BridgeError::Config(_)));
        assert!(bridge_err.to_string().contains("bad toml"));
    }

    #[test]
    fn bridge_error_other_variants() {
        let err = BridgeError::Disconnected;
        assert_eq!(err.to_string(), "bridge is not connected");

        let err = BridgeError::Dispatch("unknown object".into());
        assert_eq!(err.to_string(), "dispatch error: unknown object");

        let err = BridgeError::Other("something went wrong".into());
        assert_eq!(err.to_string(), "something went wrong");
    }
}
