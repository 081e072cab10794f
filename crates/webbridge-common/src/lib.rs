pub mod errors;

pub use errors::{BridgeError, ConfigError, SurfaceError};

pub type Result<T> = std::result::Result<T, BridgeError>;
