//! `wry`-backed render surface for the webbridge protocol.
//!
//! Wraps a `wry::WebView` as a [`webbridge_core::RenderSurface`]:
//! - script→native calls ride the IPC handler (fire-and-forget) or a
//!   synchronous XHR against the reserved scheme (sync-returning),
//! - the reserved scheme is served by a custom protocol handler backed by
//!   the bridge's resource interceptor,
//! - binding wrappers and per-navigation init scripts are delivered to each
//!   new document through a bootstrap endpoint fetched by a persistent
//!   initialization script, so bindings survive page loads and reloads.

pub mod glue;
pub mod options;
pub mod surface;

pub use options::WebViewOptions;
pub use surface::{WryHost, WrySurface};
