//! The native dispatch boundary.
//!
//! Everything behind [`NativeDispatcher`] is the native core's business;
//! the bridge only defines the contract for reaching it. Calls are
//! string-based: method name plus a flat list of string arguments in,
//! optional string result out.

use std::collections::HashMap;
use std::path::PathBuf;

/// Opaque handle to native-side resources handed over at session init.
#[derive(Debug, Clone, Default)]
pub struct ResourceBundle {
    /// Directory for native-side persistent data, if any.
    pub data_dir: Option<PathBuf>,
    /// Named byte assets bundled with the application.
    pub assets: HashMap<String, Vec<u8>>,
}

impl ResourceBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn with_asset(mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.assets.insert(name.into(), data.into());
        self
    }
}

/// Native answer for a reserved-scheme resource request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedResource {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl EmbeddedResource {
    pub fn new(mime_type: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }
}

/// Contract the native core fulfills for the bridge.
///
/// `dispatch` and `resolve_embedded_resource` may be called from arbitrary
/// threads — the surface raises resource requests and script calls off the
/// dispatch context. Implementations must be `Send + Sync`.
pub trait NativeDispatcher: Send + Sync {
    /// Establish native-side state for a session.
    fn init(&self, tag: &str, launch_params: &[String], resources: &ResourceBundle);

    /// Release native-side state.
    fn teardown(&self);

    /// A page is starting for `url`.
    fn on_page_starting(&self, url: &str);

    /// Call target for proxy object invocations.
    ///
    /// Returns `None` when the call produces no value or fails; the bridge
    /// never turns that into a page-level error.
    fn dispatch(&self, object: &str, method: &str, args: &[String]) -> Option<String>;

    /// Call target for reserved-scheme resource requests. `None` means the
    /// request falls through to default handling.
    fn resolve_embedded_resource(&self, url: &str) -> Option<EmbeddedResource>;
}
