//! Console message routing.
//!
//! A `PendingObject` named `"console"` is never bound into the page;
//! instead it becomes the console sink. Page console output is forwarded to
//! the sink as `invoke("log", [message])`. With no sink, messages are
//! locally logged and recorded as events — never a failure.

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::events::{BridgeEvent, EventSink};
use crate::proxy::ProxyObject;

/// Shared console route installed on the render surface at connect time.
///
/// The surface delivers console events from whatever thread they arrive on;
/// the slot is mutated only from the dispatch context (during a navigation
/// cycle's drain) or at disconnect.
#[derive(Clone)]
pub struct ConsoleRoute {
    sink: Arc<Mutex<Option<Arc<dyn ProxyObject>>>>,
    events: EventSink,
}

impl ConsoleRoute {
    pub fn new(events: EventSink) -> Self {
        Self {
            sink: Arc::new(Mutex::new(None)),
            events,
        }
    }

    /// Install the sink proxy. Replaces any previous sink.
    pub fn bind(&self, proxy: Arc<dyn ProxyObject>) {
        if let Ok(mut slot) = self.sink.lock() {
            *slot = Some(proxy);
        }
    }

    /// Drop the sink (session teardown).
    pub fn clear(&self) {
        if let Ok(mut slot) = self.sink.lock() {
            *slot = None;
        }
    }

    pub fn is_bound(&self) -> bool {
        self.sink.lock().map(|slot| slot.is_some()).unwrap_or(false)
    }

    /// Deliver one console message from the page.
    pub fn deliver(&self, message: &str) {
        let proxy = self.sink.lock().ok().and_then(|slot| slot.clone());
        match proxy {
            Some(proxy) => {
                proxy.invoke("log", &[message.to_string()]);
            }
            None => {
                debug!(message, "console (no sink bound)");
                self.events.push(BridgeEvent::ConsoleMessage {
                    message: message.to_string(),
                });
            }
        }
    }
}
