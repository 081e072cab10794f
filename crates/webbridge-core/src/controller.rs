//! Bridge orchestration.
//!
//! `BridgeController` owns the session between the native core and one
//! render surface: it marshals navigation onto the dispatch context, drains
//! the injection queue exactly once per navigation cycle, captures the
//! console sink, and notifies the native core when a page starts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::config::BridgeConfig;
use crate::console::ConsoleRoute;
use crate::dispatch::{NativeDispatcher, ResourceBundle};
use crate::events::{BridgeEvent, EventSink};
use crate::executor::DispatchContext;
use crate::intercept::ResourceInterceptor;
use crate::navigation::NavigationTarget;
use crate::proxy::{CallShape, NativeProxy};
use crate::queue::{InjectionQueue, PendingObject};
use crate::surface::{BridgeHooks, RenderSurface, SurfaceSettings};

/// URL prefix used by script-eval navigations; such loads are internal and
/// never reported to the native core as page starts.
const SCRIPT_URL_PREFIX: &str = "javascript:";

/// The live association between the native core and one render surface.
struct BridgeSession {
    surface: Arc<dyn RenderSurface>,
    ctx: DispatchContext,
    queue: Arc<Mutex<InjectionQueue>>,
    console: ConsoleRoute,
    /// Liveness gate shared with every proxy minted for this session.
    gate: Arc<AtomicBool>,
}

/// Orchestrates navigation, object injection, console redirection, and
/// page-lifecycle notification for at most one active session.
pub struct BridgeController {
    config: BridgeConfig,
    dispatcher: Arc<dyn NativeDispatcher>,
    events: EventSink,
    session: Mutex<Option<BridgeSession>>,
}

impl BridgeController {
    pub fn new(config: BridgeConfig, dispatcher: Arc<dyn NativeDispatcher>) -> Self {
        Self {
            config,
            dispatcher,
            events: EventSink::new(),
            session: Mutex::new(None),
        }
    }

    /// Bind a render surface and establish the bridge handlers on it.
    ///
    /// With no surface the bridge falls silently into a disabled state:
    /// every subsequent operation is a logged no-op. A successful connect
    /// enables script execution, disables content caching, installs the
    /// console/interception/lifecycle hooks, and initializes the native
    /// core.
    pub fn connect(
        &self,
        surface: Option<Arc<dyn RenderSurface>>,
        ctx: DispatchContext,
        resources: ResourceBundle,
    ) {
        let Some(surface) = surface else {
            warn!("no render surface; bridge disabled");
            return;
        };

        // Replacing a live session tears the old one down first.
        self.disconnect();

        if let Err(e) = surface.apply_settings(&SurfaceSettings::default()) {
            warn!(error = %e, "failed to apply surface settings");
        }

        let console = ConsoleRoute::new(self.events.clone());
        let interceptor =
            ResourceInterceptor::new(self.config.scheme.clone(), self.dispatcher.clone());
        if let Err(e) = surface.install_hooks(BridgeHooks {
            console: console.clone(),
            interceptor,
            events: self.events.clone(),
        }) {
            warn!(error = %e, "failed to install bridge hooks");
        }

        self.dispatcher
            .init(&self.config.tag, &self.config.launch_params, &resources);

        let session = BridgeSession {
            surface,
            ctx,
            queue: Arc::new(Mutex::new(InjectionQueue::new())),
            console,
            gate: Arc::new(AtomicBool::new(true)),
        };
        *self.session.lock().unwrap() = Some(session);
        debug!(tag = %self.config.tag, scheme = %self.config.scheme, "bridge connected");
    }

    /// Release the surface and dispatch-context reference and tear down the
    /// native core. Safe to call when already disconnected.
    pub fn disconnect(&self) {
        let session = self.session.lock().unwrap().take();
        let Some(session) = session else {
            return;
        };

        session.gate.store(false, Ordering::Release);
        session.console.clear();
        self.events.push(BridgeEvent::Disconnected);
        self.dispatcher.teardown();
        debug!("bridge disconnected");
    }

    pub fn is_connected(&self) -> bool {
        self.session.lock().unwrap().is_some()
    }

    /// Host-facing event sink.
    pub fn events(&self) -> EventSink {
        self.events.clone()
    }

    /// Queue a proxy registration for the next navigation.
    ///
    /// Safe to call repeatedly; has no effect on the currently displayed
    /// page. An entry named `"console"` becomes the console sink instead of
    /// a binding.
    pub fn set_object(
        &self,
        name: impl Into<String>,
        binding_name: impl Into<String>,
        init_script: impl Into<String>,
    ) {
        let entry = PendingObject::new(name, binding_name, init_script);

        let guard = self.session.lock().unwrap();
        let Some(session) = guard.as_ref() else {
            warn!(object = %entry.name, "set_object on disconnected bridge");
            return;
        };

        let queue = session.queue.clone();
        session.ctx.submit(move || {
            queue.lock().unwrap().push(entry);
        });
    }

    /// Navigate to a standard URL.
    pub fn go_standard(&self, url: impl Into<String>) {
        self.go(NavigationTarget::standard(url));
    }

    /// Load inline content with `base_url` as the resolution base.
    pub fn go_embedded(
        &self,
        base_url: impl Into<String>,
        data: impl Into<Vec<u8>>,
        mime_type: impl Into<String>,
    ) {
        self.go(NavigationTarget::embedded(base_url, data, mime_type));
    }

    /// Schedule one full navigation cycle on the dispatch context.
    ///
    /// Cycles are single closures executed in submission order, so a later
    /// navigation can never interleave with an earlier cycle's drain.
    pub fn go(&self, target: NavigationTarget) {
        let guard = self.session.lock().unwrap();
        let Some(session) = guard.as_ref() else {
            warn!(url = %target.reported_url(), "navigation on disconnected bridge");
            return;
        };

        let surface = session.surface.clone();
        let queue = session.queue.clone();
        let console = session.console.clone();
        let gate = session.gate.clone();
        let dispatcher = self.dispatcher.clone();
        let events = self.events.clone();

        session.ctx.submit(move || {
            run_cycle(&target, &surface, &queue, &console, &gate, &dispatcher, &events);
        });
    }
}

/// One navigation cycle: take the queue, bind all objects, navigate, run
/// init scripts in registration order, notify the native core.
fn run_cycle(
    target: &NavigationTarget,
    surface: &Arc<dyn RenderSurface>,
    queue: &Arc<Mutex<InjectionQueue>>,
    console: &ConsoleRoute,
    gate: &Arc<AtomicBool>,
    dispatcher: &Arc<dyn NativeDispatcher>,
    events: &EventSink,
) {
    let entries = queue.lock().unwrap().take_all();
    let url = target.reported_url().to_string();
    debug!(url = %url, objects = entries.len(), "navigation cycle");

    // Pass 1: bind everything, so later init scripts may depend on earlier
    // bindings. The console entry is captured, never bound, and its init
    // script is skipped (there is no binding for it to wrap).
    for entry in &entries {
        if entry.is_console() {
            console.bind(Arc::new(NativeProxy::new(
                entry.name.clone(),
                CallShape::FireAndForget,
                dispatcher.clone(),
                gate.clone(),
            )));
            continue;
        }
        let proxy = Arc::new(NativeProxy::new(
            entry.name.clone(),
            CallShape::SyncReturning,
            dispatcher.clone(),
            gate.clone(),
        ));
        if let Err(e) = surface.bind_object(&entry.binding_name, proxy) {
            warn!(binding = %entry.binding_name, error = %e, "bind failed");
        }
    }

    events.push(BridgeEvent::NavigationStarted { url: url.clone() });
    if let Err(e) = surface.navigate(target) {
        warn!(url = %url, error = %e, "navigation failed");
        return;
    }

    // Pass 2: init scripts, registration order, exactly once.
    for entry in &entries {
        if entry.is_console() || entry.init_script.is_empty() {
            continue;
        }
        if let Err(e) = surface.run_script(&entry.init_script) {
            warn!(binding = %entry.binding_name, error = %e, "init script failed");
        }
    }

    // Script-eval loads are internal plumbing, not page starts.
    if !url.starts_with(SCRIPT_URL_PREFIX) {
        dispatcher.on_page_starting(&url);
    }
}
