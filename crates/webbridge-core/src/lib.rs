//! Bridge protocol between a native application core and an embedded
//! web-rendering surface.
//!
//! The native side navigates the surface, serves content on a reserved
//! custom scheme, and exposes callable proxy objects to page scripts;
//! page scripts call back through a string-based dispatch boundary.
//! The concrete surface (a WebView) is behind the [`RenderSurface`]
//! trait — see the `webbridge-webview` crate for the `wry` adapter.
//!
//! Sequencing contract: proxy objects queued via
//! [`BridgeController::set_object`] are bound to the *next* navigation,
//! in registration order, before their initialization scripts run; the
//! queue is drained exactly once per navigation cycle.

pub mod config;
pub mod console;
pub mod controller;
pub mod dispatch;
pub mod events;
pub mod executor;
pub mod intercept;
pub mod navigation;
pub mod proxy;
pub mod queue;
pub mod surface;

pub use config::BridgeConfig;
pub use console::ConsoleRoute;
pub use controller::BridgeController;
pub use dispatch::{EmbeddedResource, NativeDispatcher, ResourceBundle};
pub use events::{BridgeEvent, EventSink};
pub use executor::{DispatchContext, DispatchQueue};
pub use intercept::{InterceptOutcome, ResourceInterceptor, ResourceResponse};
pub use navigation::NavigationTarget;
pub use proxy::{CallShape, InvokeMessage, NativeProxy, ProxyObject};
pub use queue::{InjectionQueue, PendingObject, CONSOLE_OBJECT};
pub use surface::{BridgeHooks, CachePolicy, RenderSurface, SurfaceSettings};
