//! The `wry`-backed render surface.
//!
//! A `wry::WebView` must stay on the UI thread, while the bridge hands the
//! surface across threads behind `Arc<dyn RenderSurface>`. The adapter is
//! therefore split in two:
//!
//! - [`WrySurface`] — the thread-safe handle the bridge talks to. State
//!   mutations (bindings, hooks, page scripts) land in shared state read by
//!   the WebView's handler closures; operations that need the WebView
//!   itself (navigation, eval) are forwarded as commands.
//! - [`WryHost`] — owned by the UI thread alongside the WebView; its
//!   [`pump`](WryHost::pump) drains forwarded commands, in order, right
//!   after the host pumps the bridge's dispatch queue.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};

use tracing::{debug, warn};
use wry::raw_window_handle;
use wry::WebViewBuilder;

use webbridge_common::SurfaceError;
use webbridge_core::{
    BridgeEvent, BridgeHooks, CachePolicy, InterceptOutcome, InvokeMessage, NavigationTarget,
    ProxyObject, RenderSurface, SurfaceSettings, CONSOLE_OBJECT,
};

use crate::glue;
use crate::options::WebViewOptions;

/// State shared between the `RenderSurface` handle and the handler closures
/// attached to the WebView at build time.
struct SharedState {
    /// Proxies by object identity, consulted by the IPC and invoke
    /// handlers.
    registry: Mutex<HashMap<String, Arc<dyn ProxyObject>>>,
    /// Binding wrapper scripts in registration order. Persistent: bindings
    /// survive page loads and reloads, like a native script interface.
    bindings: Mutex<Vec<(String, String)>>,
    /// One-shot scripts for the next document (a navigation cycle's init
    /// scripts), drained when the bootstrap endpoint serves them.
    page_scripts: Mutex<Vec<String>>,
    /// Bridge handlers, installed at connect time.
    hooks: Mutex<Option<BridgeHooks>>,
    /// Whether protocol responses forbid caching.
    no_store: AtomicBool,
}

impl SharedState {
    fn new() -> Self {
        Self {
            registry: Mutex::new(HashMap::new()),
            bindings: Mutex::new(Vec::new()),
            page_scripts: Mutex::new(Vec::new()),
            hooks: Mutex::new(None),
            no_store: AtomicBool::new(true),
        }
    }

    fn hooks(&self) -> Option<BridgeHooks> {
        self.hooks.lock().unwrap().clone()
    }

    /// Stage a binding wrapper; a rebind under the same symbol replaces the
    /// previous wrapper in place.
    fn stage_binding(&self, binding_name: &str, script: String) {
        let mut bindings = self.bindings.lock().unwrap();
        match bindings.iter_mut().find(|(name, _)| name == binding_name) {
            Some(entry) => entry.1 = script,
            None => bindings.push((binding_name.to_string(), script)),
        }
    }

    /// Assemble the bootstrap script for a booting document: every binding
    /// wrapper in registration order, then the one-shot page scripts
    /// (drained).
    fn bootstrap_payload(&self) -> String {
        let mut parts: Vec<String> = self
            .bindings
            .lock()
            .unwrap()
            .iter()
            .map(|(_, script)| script.clone())
            .collect();
        parts.extend(std::mem::take(&mut *self.page_scripts.lock().unwrap()));
        parts.join("\n")
    }

    /// Route one fire-and-forget message from the page.
    fn route_message(&self, body: &str) {
        let Some(msg) = InvokeMessage::from_json(body) else {
            warn!(body_len = body.len(), "ipc message rejected: not an invoke message");
            return;
        };

        if msg.object == CONSOLE_OBJECT {
            let message = msg.args.first().map(String::as_str).unwrap_or("");
            match self.hooks() {
                Some(hooks) => hooks.console.deliver(message),
                None => debug!(message, "console message before hooks installed"),
            }
            return;
        }

        let proxy = self.registry.lock().unwrap().get(&msg.object).cloned();
        match proxy {
            Some(proxy) => {
                proxy.invoke(&msg.method, &msg.args);
            }
            None => warn!(object = %msg.object, method = %msg.method, "invoke on unknown object"),
        }
    }

    /// Answer one sync-returning call. Bounded failure mode: unknown
    /// object, malformed message, or valueless dispatch all yield an empty
    /// body immediately.
    fn answer_invoke(&self, body: &[u8]) -> String {
        let Some(msg) = InvokeMessage::from_json(&String::from_utf8_lossy(body)) else {
            return String::new();
        };
        let proxy = self.registry.lock().unwrap().get(&msg.object).cloned();
        proxy
            .and_then(|proxy| proxy.invoke(&msg.method, &msg.args))
            .unwrap_or_default()
    }

    /// Handle one reserved-scheme request.
    fn answer_protocol_request(&self, scheme: &str, uri: &str, body: &[u8]) -> ProtocolReply {
        match endpoint_host(uri, scheme) {
            Some(glue::INVOKE_PATH) => ProtocolReply {
                status: 200,
                content_type: "text/plain; charset=utf-8".to_string(),
                body: self.answer_invoke(body).into_bytes(),
            },
            Some(glue::BOOTSTRAP_PATH) => ProtocolReply {
                status: 200,
                content_type: "application/javascript; charset=utf-8".to_string(),
                body: self.bootstrap_payload().into_bytes(),
            },
            _ => {
                let outcome = match self.hooks() {
                    Some(hooks) => hooks.interceptor.intercept(uri),
                    None => InterceptOutcome::PassThrough,
                };
                match outcome {
                    InterceptOutcome::Respond(resp) => {
                        let content_type = match resp.charset {
                            Some(charset) => format!("{}; charset={charset}", resp.mime_type),
                            None => resp.mime_type,
                        };
                        ProtocolReply {
                            status: 200,
                            content_type,
                            body: resp.data,
                        }
                    }
                    InterceptOutcome::PassThrough => {
                        // A wry protocol handler must answer; true
                        // fall-through to the network is not available on
                        // this surface.
                        debug!(uri, "unresolvable reserved-scheme request");
                        ProtocolReply {
                            status: 404,
                            content_type: "text/plain".to_string(),
                            body: b"Not Found".to_vec(),
                        }
                    }
                }
            }
        }
    }
}

/// Transport-level reply from the protocol handler.
struct ProtocolReply {
    status: u16,
    content_type: String,
    body: Vec<u8>,
}

/// The host part of a reserved-scheme URI, if the URI is on that scheme.
fn endpoint_host<'a>(uri: &'a str, scheme: &str) -> Option<&'a str> {
    let rest = uri.strip_prefix(scheme)?.strip_prefix("://")?;
    Some(rest.split(['/', '?', '#']).next().unwrap_or(""))
}

/// Operations that need the WebView itself, forwarded to the UI thread.
enum SurfaceCommand {
    Navigate(NavigationTarget),
    Eval(String),
}

/// Thread-safe render-surface handle for one bridged WebView.
pub struct WrySurface {
    shared: Arc<SharedState>,
    commands: mpsc::Sender<SurfaceCommand>,
}

impl WrySurface {
    /// Evaluate script in the current document, outside any navigation
    /// cycle.
    pub fn eval(&self, js: impl Into<String>) -> Result<(), SurfaceError> {
        self.commands
            .send(SurfaceCommand::Eval(js.into()))
            .map_err(|_| SurfaceError::Detached)
    }
}

impl RenderSurface for WrySurface {
    fn apply_settings(&self, settings: &SurfaceSettings) -> Result<(), SurfaceError> {
        if !settings.script_execution {
            return Err(SurfaceError::Settings(
                "script execution cannot be disabled on this surface".into(),
            ));
        }
        let no_store = matches!(settings.cache, CachePolicy::Disabled);
        self.shared.no_store.store(no_store, Ordering::Relaxed);
        Ok(())
    }

    fn install_hooks(&self, hooks: BridgeHooks) -> Result<(), SurfaceError> {
        *self.shared.hooks.lock().unwrap() = Some(hooks);
        Ok(())
    }

    fn bind_object(
        &self,
        binding_name: &str,
        proxy: Arc<dyn ProxyObject>,
    ) -> Result<(), SurfaceError> {
        let script = glue::binding_script(proxy.name(), binding_name, proxy.call_shape());
        self.shared
            .registry
            .lock()
            .unwrap()
            .insert(proxy.name().to_string(), proxy);
        self.shared.stage_binding(binding_name, script);
        Ok(())
    }

    fn navigate(&self, target: &NavigationTarget) -> Result<(), SurfaceError> {
        if let NavigationTarget::Embedded { mime_type, .. } = target {
            if !mime_type.starts_with("text/html") {
                return Err(SurfaceError::Navigation(format!(
                    "unsupported embedded mime type: {mime_type}"
                )));
            }
        }
        self.commands
            .send(SurfaceCommand::Navigate(target.clone()))
            .map_err(|_| SurfaceError::Detached)
    }

    fn run_script(&self, script: &str) -> Result<(), SurfaceError> {
        // Cycle scripts run when the incoming document boots, delivered
        // through the bootstrap endpoint in submission order.
        self.shared
            .page_scripts
            .lock()
            .unwrap()
            .push(script.to_string());
        Ok(())
    }
}

/// UI-thread owner of the WebView. Pump it from the same loop that pumps
/// the bridge's dispatch queue, after each dispatch pass.
pub struct WryHost {
    webview: wry::WebView,
    commands: mpsc::Receiver<SurfaceCommand>,
}

impl WryHost {
    /// Create a child WebView under `window`, wired for the given reserved
    /// scheme, and the surface handle to connect the bridge with. The
    /// bridge's hooks arrive later via `RenderSurface::install_hooks`.
    pub fn create<W: raw_window_handle::HasWindowHandle>(
        window: &W,
        bounds: wry::Rect,
        options: &WebViewOptions,
        scheme: &str,
    ) -> Result<(WryHost, Arc<WrySurface>), wry::Error> {
        let shared = Arc::new(SharedState::new());
        let boot = format!(
            "{}\n{}",
            glue::transport_script(scheme),
            glue::console_capture_script()
        );

        let mut builder = WebViewBuilder::new()
            .with_bounds(bounds)
            .with_transparent(options.transparent)
            .with_devtools(options.devtools)
            .with_clipboard(options.clipboard)
            .with_autoplay(options.autoplay)
            .with_focused(false)
            .with_initialization_script(&boot);

        if let Some(ua) = &options.user_agent {
            builder = builder.with_user_agent(ua);
        }

        // JS -> Rust, fire-and-forget.
        let ipc_shared = Arc::clone(&shared);
        builder = builder.with_ipc_handler(move |request| {
            ipc_shared.route_message(request.body());
        });

        // Reserved scheme: sync invoke endpoint, bootstrap, intercepted
        // resources. Runs off the dispatch context.
        let proto_shared = Arc::clone(&shared);
        let proto_scheme = scheme.to_string();
        builder = builder.with_custom_protocol(scheme.to_string(), move |_wv_id, request| {
            let uri = request.uri().to_string();
            let reply = proto_shared.answer_protocol_request(&proto_scheme, &uri, request.body());

            let mut response = wry::http::Response::builder()
                .status(reply.status)
                .header("Content-Type", reply.content_type);
            if proto_shared.no_store.load(Ordering::Relaxed) {
                response = response.header("Cache-Control", "no-store");
            }
            response.body(Cow::from(reply.body)).unwrap()
        });

        // Load progress, reported as host-facing events.
        let load_shared = Arc::clone(&shared);
        builder = builder.with_on_page_load_handler(move |event, url| {
            if let wry::PageLoadEvent::Finished = event {
                debug!(url = %url, "page load finished");
                if let Some(hooks) = load_shared.hooks() {
                    hooks.events.push(BridgeEvent::NavigationFinished { url });
                }
            }
        });

        let webview = builder.build_as_child(window)?;
        debug!(scheme, "bridged webview created");

        let (tx, rx) = mpsc::channel();
        let host = WryHost {
            webview,
            commands: rx,
        };
        let surface = Arc::new(WrySurface {
            shared,
            commands: tx,
        });
        Ok((host, surface))
    }

    /// Execute every command forwarded so far, in order. Returns how many
    /// ran.
    pub fn pump(&self) -> usize {
        let mut ran = 0;
        while let Ok(command) = self.commands.try_recv() {
            match command {
                SurfaceCommand::Navigate(target) => self.apply_navigation(&target),
                SurfaceCommand::Eval(js) => {
                    if let Err(e) = self.webview.evaluate_script(&js) {
                        warn!(error = %e, "script evaluation failed");
                    }
                }
            }
            ran += 1;
        }
        ran
    }

    fn apply_navigation(&self, target: &NavigationTarget) {
        let result = match target {
            NavigationTarget::Standard { url } => self.webview.load_url(url),
            NavigationTarget::Embedded {
                base_url, data, ..
            } => {
                // The engine loads inline HTML under its own origin;
                // relative references should use absolute reserved-scheme
                // URLs rather than relying on `base_url` resolution.
                debug!(base_url = %base_url, len = data.len(), "loading embedded content");
                self.webview.load_html(&String::from_utf8_lossy(data))
            }
        };
        if let Err(e) = result {
            warn!(url = %target.reported_url(), error = %e, "navigation failed");
        }
    }

    /// Set the WebView bounds within the parent window.
    pub fn set_bounds(&self, bounds: wry::Rect) -> Result<(), wry::Error> {
        self.webview.set_bounds(bounds)
    }

    /// Show or hide the WebView.
    pub fn set_visible(&self, visible: bool) -> Result<(), wry::Error> {
        self.webview.set_visible(visible)
    }

    /// Open devtools (if enabled).
    pub fn open_devtools(&self) {
        self.webview.open_devtools();
    }
}
