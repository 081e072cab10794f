//! Host-facing bridge events.

use std::sync::{Arc, Mutex};

/// Observations the host loop may want to react to. These are informational;
/// the authoritative page-starting notification goes to the native
/// dispatcher directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    /// A navigation cycle started for the reported URL.
    NavigationStarted { url: String },
    /// The surface reports the page finished loading.
    NavigationFinished { url: String },
    /// A console message arrived while no sink was bound.
    ConsoleMessage { message: String },
    /// The session was torn down.
    Disconnected,
}

/// Event sink drained by the host's main loop.
#[derive(Clone, Default)]
pub struct EventSink {
    inner: Arc<Mutex<Vec<BridgeEvent>>>,
}

impl EventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: BridgeEvent) {
        if let Ok(mut events) = self.inner.lock() {
            events.push(event);
        }
    }

    /// Drain all pending events.
    pub fn drain(&self) -> Vec<BridgeEvent> {
        match self.inner.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let sink = EventSink::new();
        sink.push(BridgeEvent::NavigationStarted {
            url: "https://example.test/".into(),
        });
        sink.push(BridgeEvent::Disconnected);

        let events = sink.drain();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], BridgeEvent::NavigationStarted { .. }));
        assert!(matches!(events[1], BridgeEvent::Disconnected));

        assert!(sink.drain().is_empty());
    }

    #[test]
    fn clones_share_the_same_queue() {
        let sink = EventSink::new();
        let clone = sink.clone();
        clone.push(BridgeEvent::ConsoleMessage {
            message: "hi".into(),
        });
        assert_eq!(sink.drain().len(), 1);
    }
}
