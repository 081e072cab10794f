//! Script-side glue.
//!
//! Generates the JavaScript injected into every page: the transport
//! (postMessage for fire-and-forget, synchronous XHR for sync-returning
//! calls), the console capture, and per-binding wrapper objects exposing
//! `invoke(method, args)`.

use webbridge_core::{CallShape, CONSOLE_OBJECT};

/// Path marker for the synchronous invoke endpoint on the reserved scheme.
pub const INVOKE_PATH: &str = "__invoke__";

/// Path marker for the per-page bootstrap script on the reserved scheme.
pub const BOOTSTRAP_PATH: &str = "__bootstrap__";

/// Persistent initialization script: installs the transport and pulls the
/// bootstrap script (binding wrappers + queued init scripts) for the new
/// document before page scripts run.
pub fn transport_script(scheme: &str) -> String {
    let scheme_js = json_str(scheme);
    format!(
        r#"(function() {{
    if (window.__webbridge) {{ return; }}
    var scheme = {scheme_js};
    window.__webbridge = {{
        post: function(object, method, args) {{
            window.ipc.postMessage(JSON.stringify({{
                object: object, method: method, args: args || []
            }}));
        }},
        call: function(object, method, args) {{
            var xhr = new XMLHttpRequest();
            try {{
                xhr.open('POST', scheme + '://{INVOKE_PATH}/', false);
                xhr.send(JSON.stringify({{
                    object: object, method: method, args: args || []
                }}));
            }} catch (e) {{
                return '';
            }}
            return xhr.status === 200 ? xhr.responseText : '';
        }}
    }};
    try {{
        var boot = new XMLHttpRequest();
        boot.open('GET', scheme + '://{BOOTSTRAP_PATH}/', false);
        boot.send();
        if (boot.status === 200 && boot.responseText) {{
            (0, eval)(boot.responseText);
        }}
    }} catch (e) {{
        // No bridge behind the scheme; the page runs without bindings.
    }}
}})();"#
    )
}

/// Console capture: forwards console output over the fire-and-forget
/// transport as `invoke("log", [message])` on the reserved "console"
/// object, then falls through to the original console.
///
/// The forwarder itself must never call `console.*`: the native sink may
/// log, which would recurse.
pub fn console_capture_script() -> String {
    let console_js = json_str(CONSOLE_OBJECT);
    format!(
        r#"(function() {{
    var levels = ['log', 'info', 'warn', 'error'];
    for (var i = 0; i < levels.length; i++) {{
        (function(level) {{
            var original = console[level];
            console[level] = function() {{
                var parts = [];
                for (var j = 0; j < arguments.length; j++) {{
                    parts.push(String(arguments[j]));
                }}
                try {{
                    window.__webbridge.post({console_js}, 'log', [parts.join(' ')]);
                }} catch (e) {{}}
                if (original) {{ original.apply(console, arguments); }}
            }};
        }})(levels[i]);
    }}
}})();"#
    )
}

/// Wrapper object for one binding: a global symbol exposing
/// `invoke(method, args)` over the transport matching the proxy's call
/// shape.
pub fn binding_script(name: &str, binding_name: &str, shape: CallShape) -> String {
    let name_js = json_str(name);
    let binding_js = json_str(binding_name);
    let transport = match shape {
        CallShape::FireAndForget => "window.__webbridge.post(name, method, args); return undefined;",
        CallShape::SyncReturning => "return window.__webbridge.call(name, method, args);",
    };
    format!(
        r#"(function() {{
    var name = {name_js};
    window[{binding_js}] = {{
        invoke: function(method, args) {{ {transport} }}
    }};
}})();"#
    )
}

/// JSON-escape a string for safe embedding in generated script text.
fn json_str(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_installs_once_and_uses_the_scheme() {
        let script = transport_script("embedded");
        assert!(script.contains("if (window.__webbridge) { return; }"));
        assert!(script.contains(r#"var scheme = "embedded";"#));
        assert!(script.contains("__invoke__"));
        assert!(script.contains("__bootstrap__"));
    }

    #[test]
    fn sync_call_uses_synchronous_xhr() {
        let script = transport_script("embedded");
        // Third `open` argument false = synchronous.
        assert!(script.contains("xhr.open('POST', scheme + '://__invoke__/', false)"));
    }

    #[test]
    fn console_capture_never_calls_console_itself() {
        let script = console_capture_script();
        // The forwarder body posts over the transport and only calls the
        // saved original, never console.* directly.
        assert!(script.contains("window.__webbridge.post"));
        assert!(!script.contains("console.log("));
        assert!(script.contains("original.apply(console, arguments)"));
    }

    #[test]
    fn fire_and_forget_binding_returns_nothing() {
        let script = binding_script("app", "nproxy", CallShape::FireAndForget);
        assert!(script.contains(r#"window["nproxy"] ="#));
        assert!(script.contains("window.__webbridge.post(name, method, args)"));
        assert!(!script.contains("__webbridge.call"));
    }

    #[test]
    fn sync_returning_binding_returns_the_call_result() {
        let script = binding_script("app", "nproxy", CallShape::SyncReturning);
        assert!(script.contains("return window.__webbridge.call(name, method, args);"));
    }

    #[test]
    fn names_are_json_escaped() {
        let script = binding_script("a\"b", "c'd\"e", CallShape::SyncReturning);
        assert!(script.contains(r#"var name = "a\"b";"#));
        assert!(script.contains(r#"window["c'd\"e"] ="#));
    }
}
