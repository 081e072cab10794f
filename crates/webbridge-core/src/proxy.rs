//! Proxy objects: native-backed callables exposed to page scripts.
//!
//! A proxy exposes one operation to script code, `invoke(method, args)`,
//! with a flat ordered list of string arguments. The call is forwarded to
//! the native dispatcher as `(object identity, method, args)`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dispatch::NativeDispatcher;

/// How script-side calls to a binding behave. Fixed per binding at
/// registration; the two shapes are never mixed on one binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallShape {
    /// No return value; the native side handles the call asynchronously and
    /// replies, if at all, through a separately injected callback.
    FireAndForget,
    /// The invoking script thread blocks until the dispatcher responds.
    /// The failure mode is bounded: a failed or valueless dispatch returns
    /// an empty result immediately, never a hang.
    SyncReturning,
}

/// A named callable gateway from page scripts into native code.
pub trait ProxyObject: Send + Sync {
    /// Logical identity used for dispatch.
    fn name(&self) -> &str;

    fn call_shape(&self) -> CallShape;

    /// Forward a call. `None` means no value (always the case for
    /// fire-and-forget proxies, and the failure fallback for
    /// sync-returning ones).
    fn invoke(&self, method: &str, args: &[String]) -> Option<String>;
}

/// Standard proxy forwarding every call to the native dispatcher.
///
/// Holds the session liveness gate: proxies are owned by the session and
/// invalidated on disconnect, after which invocations are logged no-ops.
pub struct NativeProxy {
    name: String,
    shape: CallShape,
    dispatcher: Arc<dyn NativeDispatcher>,
    gate: Arc<AtomicBool>,
}

impl NativeProxy {
    pub fn new(
        name: impl Into<String>,
        shape: CallShape,
        dispatcher: Arc<dyn NativeDispatcher>,
        gate: Arc<AtomicBool>,
    ) -> Self {
        Self {
            name: name.into(),
            shape,
            dispatcher,
            gate,
        }
    }
}

impl ProxyObject for NativeProxy {
    fn name(&self) -> &str {
        &self.name
    }

    fn call_shape(&self) -> CallShape {
        self.shape
    }

    fn invoke(&self, method: &str, args: &[String]) -> Option<String> {
        if !self.gate.load(Ordering::Acquire) {
            warn!(object = %self.name, method, "proxy invoked after disconnect");
            return None;
        }

        debug!(object = %self.name, method, argc = args.len(), "proxy invoke");
        let result = self.dispatcher.dispatch(&self.name, method, args);
        match self.shape {
            CallShape::FireAndForget => None,
            CallShape::SyncReturning => result,
        }
    }
}

/// Wire format of a script→native call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvokeMessage {
    /// Target object identity.
    pub object: String,
    /// Method name.
    pub method: String,
    /// Flat ordered string arguments; no nested structures.
    #[serde(default)]
    pub args: Vec<String>,
}

impl InvokeMessage {
    /// Parse a message from raw JSON. Malformed input is a routing miss,
    /// not an error.
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::dispatch::{EmbeddedResource, ResourceBundle};

    struct RecordingDispatcher {
        calls: Mutex<Vec<(String, String, Vec<String>)>>,
        reply: Option<String>,
    }

    impl RecordingDispatcher {
        fn new(reply: Option<String>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                reply,
            }
        }
    }

    impl NativeDispatcher for RecordingDispatcher {
        fn init(&self, _tag: &str, _launch_params: &[String], _resources: &ResourceBundle) {}
        fn teardown(&self) {}
        fn on_page_starting(&self, _url: &str) {}

        fn dispatch(&self, object: &str, method: &str, args: &[String]) -> Option<String> {
            self.calls
                .lock()
                .unwrap()
                .push((object.to_string(), method.to_string(), args.to_vec()));
            self.reply.clone()
        }

        fn resolve_embedded_resource(&self, _url: &str) -> Option<EmbeddedResource> {
            None
        }
    }

    fn live_gate() -> Arc<AtomicBool> {
        Arc::new(AtomicBool::new(true))
    }

    // -- Call forwarding --

    #[test]
    fn forwards_identity_method_and_args() {
        let dispatcher = Arc::new(RecordingDispatcher::new(None));
        let proxy = NativeProxy::new(
            "app",
            CallShape::FireAndForget,
            dispatcher.clone(),
            live_gate(),
        );

        proxy.invoke("save", &["file.txt".to_string(), "contents".to_string()]);

        let calls = dispatcher.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "app");
        assert_eq!(calls[0].1, "save");
        assert_eq!(calls[0].2, ["file.txt", "contents"]);
    }

    #[test]
    fn fire_and_forget_discards_return_value() {
        let dispatcher = Arc::new(RecordingDispatcher::new(Some("ignored".into())));
        let proxy = NativeProxy::new("app", CallShape::FireAndForget, dispatcher, live_gate());
        assert_eq!(proxy.invoke("ping", &[]), None);
    }

    #[test]
    fn sync_returning_yields_dispatcher_result() {
        let dispatcher = Arc::new(RecordingDispatcher::new(Some("pong".into())));
        let proxy = NativeProxy::new("app", CallShape::SyncReturning, dispatcher, live_gate());
        assert_eq!(proxy.invoke("ping", &[]), Some("pong".to_string()));
    }

    #[test]
    fn sync_returning_absent_result_is_none() {
        let dispatcher = Arc::new(RecordingDispatcher::new(None));
        let proxy = NativeProxy::new("app", CallShape::SyncReturning, dispatcher, live_gate());
        assert_eq!(proxy.invoke("ping", &[]), None);
    }

    // -- Session gate --

    #[test]
    fn closed_gate_suppresses_dispatch() {
        let dispatcher = Arc::new(RecordingDispatcher::new(Some("pong".into())));
        let gate = Arc::new(AtomicBool::new(false));
        let proxy = NativeProxy::new("app", CallShape::SyncReturning, dispatcher.clone(), gate);

        assert_eq!(proxy.invoke("ping", &[]), None);
        assert!(dispatcher.calls.lock().unwrap().is_empty());
    }

    // -- Wire format --

    #[test]
    fn invoke_message_round_trip() {
        let msg = InvokeMessage {
            object: "app".into(),
            method: "save".into(),
            args: vec!["a".into(), "b".into()],
        };
        let parsed = InvokeMessage::from_json(&msg.to_json()).unwrap();
        assert_eq!(parsed.object, "app");
        assert_eq!(parsed.method, "save");
        assert_eq!(parsed.args, ["a", "b"]);
    }

    #[test]
    fn invoke_message_args_default_to_empty() {
        let parsed = InvokeMessage::from_json(r#"{"object":"app","method":"ping"}"#).unwrap();
        assert!(parsed.args.is_empty());
    }

    #[test]
    fn malformed_invoke_message_is_none() {
        assert!(InvokeMessage::from_json("not json").is_none());
        assert!(InvokeMessage::from_json(r#"{"object":"app"}"#).is_none());
    }
}
