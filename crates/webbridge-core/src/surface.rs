//! The render-surface seam.
//!
//! The concrete WebView implementation lives outside this crate; the
//! controller only talks to this trait. The `webbridge-webview` crate
//! provides the `wry`-backed implementation.

use std::sync::Arc;

use webbridge_common::SurfaceError;

use crate::console::ConsoleRoute;
use crate::events::EventSink;
use crate::intercept::ResourceInterceptor;
use crate::navigation::NavigationTarget;
use crate::proxy::ProxyObject;

/// How the surface may cache loaded content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Never serve stale content; every navigation reflects current native
    /// state.
    #[default]
    Disabled,
    /// Surface default caching behavior.
    SurfaceDefault,
}

/// Settings the bridge applies to the surface at connect time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSettings {
    pub script_execution: bool,
    pub cache: CachePolicy,
}

impl Default for SurfaceSettings {
    fn default() -> Self {
        Self {
            script_execution: true,
            cache: CachePolicy::Disabled,
        }
    }
}

/// Handlers the bridge installs on the surface at connect time.
#[derive(Clone)]
pub struct BridgeHooks {
    /// Route for page console output.
    pub console: ConsoleRoute,
    /// Reserved-scheme request interception.
    pub interceptor: ResourceInterceptor,
    /// Sink for surface-observed load progress.
    pub events: EventSink,
}

/// One embedded web-rendering surface, borrowed by the bridge for the
/// duration of a session.
///
/// Implementations must tolerate calls arriving via the dispatch context
/// from any submitting thread, and must raise interception/console hooks
/// from whatever thread the underlying engine uses.
pub trait RenderSurface: Send + Sync {
    /// Apply bridge-required settings (script execution on, caching off).
    fn apply_settings(&self, settings: &SurfaceSettings) -> Result<(), SurfaceError>;

    /// Install the bridge's handlers. Called once per session, before the
    /// first navigation.
    fn install_hooks(&self, hooks: BridgeHooks) -> Result<(), SurfaceError>;

    /// Expose a proxy to page scripts under `binding_name`. Takes effect
    /// for the page being navigated to.
    fn bind_object(
        &self,
        binding_name: &str,
        proxy: Arc<dyn ProxyObject>,
    ) -> Result<(), SurfaceError>;

    /// Load the target. Returns once the load is underway; completion is
    /// reported through the hooks.
    fn navigate(&self, target: &NavigationTarget) -> Result<(), SurfaceError>;

    /// Execute script text in the context of the page being navigated to
    /// (or the current page outside a navigation cycle).
    fn run_script(&self, script: &str) -> Result<(), SurfaceError>;
}
