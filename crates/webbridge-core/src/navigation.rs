//! Navigation targets.

/// Where a navigation goes: a standard URL fetched by the surface, or an
/// embedded payload supplied by the native core.
///
/// A target is immutable once constructed and consumed by exactly one
/// navigation operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
    /// Fetch and render `url` through the surface's normal loading path.
    Standard { url: String },
    /// Render `data` as inline content. `base_url` is the resolution base
    /// for relative references inside the content.
    Embedded {
        base_url: String,
        data: Vec<u8>,
        mime_type: String,
    },
}

impl NavigationTarget {
    pub fn standard(url: impl Into<String>) -> Self {
        Self::Standard { url: url.into() }
    }

    pub fn embedded(
        base_url: impl Into<String>,
        data: impl Into<Vec<u8>>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self::Embedded {
            base_url: base_url.into(),
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// The URL reported to the native core when this target starts.
    ///
    /// For embedded content this is the caller-supplied base URL; callers
    /// that want a sentinel (conventionally `"embedded:"`) pass it as the
    /// base.
    pub fn reported_url(&self) -> &str {
        match self {
            Self::Standard { url } => url,
            Self::Embedded { base_url, .. } => base_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_reports_its_url() {
        let target = NavigationTarget::standard("https://example.test/");
        assert_eq!(target.reported_url(), "https://example.test/");
    }

    #[test]
    fn embedded_reports_base_url() {
        let target = NavigationTarget::embedded("embedded:", "<html>hi</html>", "text/html");
        assert_eq!(target.reported_url(), "embedded:");
    }

    #[test]
    fn embedded_keeps_payload_bytes() {
        let bytes: &[u8] = &[0x89, 0x50, 0x4e, 0x47];
        let target = NavigationTarget::embedded("embedded:", bytes, "image/png");
        match target {
            NavigationTarget::Embedded { data, mime_type, .. } => {
                assert_eq!(data, bytes);
                assert_eq!(mime_type, "image/png");
            }
            _ => panic!("expected embedded target"),
        }
    }
}
