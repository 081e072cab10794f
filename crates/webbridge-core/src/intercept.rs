//! Resource interception for the reserved scheme.
//!
//! Every resource request raised by the render surface passes through
//! [`ResourceInterceptor::intercept`]. Requests on the reserved scheme are
//! resolved through the native dispatcher; everything else — including
//! requests the native core cannot answer — falls through to the surface's
//! default loading path. Interception never terminates a request it cannot
//! answer.
//!
//! Runs on whatever thread the surface raises requests from; holds only
//! `Arc`s and is safe to call off the dispatch context.

use std::sync::Arc;

use tracing::debug;

use crate::dispatch::NativeDispatcher;

/// Outcome of inspecting one resource request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterceptOutcome {
    /// Answer the request directly with native-provided content.
    Respond(ResourceResponse),
    /// Not ours (or unresolvable): let the surface handle it normally.
    PassThrough,
}

/// Native-provided answer for an intercepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceResponse {
    pub mime_type: String,
    /// `Some("utf-8")` for text content, `None` for binary.
    pub charset: Option<&'static str>,
    pub data: Vec<u8>,
}

/// Inspects request URLs and answers those on the reserved scheme.
#[derive(Clone)]
pub struct ResourceInterceptor {
    scheme: String,
    dispatcher: Arc<dyn NativeDispatcher>,
}

impl ResourceInterceptor {
    pub fn new(scheme: impl Into<String>, dispatcher: Arc<dyn NativeDispatcher>) -> Self {
        Self {
            scheme: scheme.into(),
            dispatcher,
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Whether `url` is on the reserved scheme. Scheme-less or unparseable
    /// URLs never match.
    pub fn matches(&self, url: &str) -> bool {
        match parse_scheme(url) {
            Some(scheme) => scheme.eq_ignore_ascii_case(&self.scheme),
            None => false,
        }
    }

    /// Inspect one request.
    pub fn intercept(&self, url: &str) -> InterceptOutcome {
        if !self.matches(url) {
            return InterceptOutcome::PassThrough;
        }

        match self.dispatcher.resolve_embedded_resource(url) {
            Some(resource) => {
                debug!(url, mime = %resource.mime_type, len = resource.data.len(), "intercepted");
                let charset = if is_text_mime(&resource.mime_type) {
                    Some("utf-8")
                } else {
                    None
                };
                InterceptOutcome::Respond(ResourceResponse {
                    mime_type: resource.mime_type,
                    charset,
                    data: resource.data,
                })
            }
            None => {
                debug!(url, "unresolvable on reserved scheme, passing through");
                InterceptOutcome::PassThrough
            }
        }
    }
}

/// Extract the scheme of a URL, if it has a well-formed one.
fn parse_scheme(url: &str) -> Option<&str> {
    let (scheme, _) = url.split_once(':')?;
    if scheme.is_empty() {
        return None;
    }
    // RFC 3986: ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        Some(scheme)
    } else {
        None
    }
}

/// Whether a MIME type is text-shaped and should carry a charset.
fn is_text_mime(mime: &str) -> bool {
    mime.starts_with("text/")
        || matches!(
            mime,
            "application/javascript"
                | "application/json"
                | "application/xml"
                | "image/svg+xml"
        )
}
