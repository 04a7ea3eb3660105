//! PDF service location
//!
//! Resolved once when the page loads and reused for every request.

use crate::config::DEFAULT_TARGET;
use crate::query::QueryParams;
use std::fmt;

/// Query parameter naming the service location
pub const API_PARAM: &str = "api";

const GENERATE_PDF_PATH: &str = "/generate-pdf";
const HEALTH_PATH: &str = "/health";

/// Resolved base URL of the PDF-generation service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigTarget {
    base: String,
}

impl ConfigTarget {
    /// Resolve from the raw `api` parameter value.
    ///
    /// A value with an `http://` or `https://` prefix is used verbatim, a bare
    /// host gets `https://`, and a missing or empty value falls back to
    /// `default_target`.
    pub fn resolve(api_param: Option<&str>, default_target: &str) -> Self {
        let base = match api_param {
            Some(api) if !api.is_empty() => {
                if api.starts_with("http://") || api.starts_with("https://") {
                    api.to_string()
                } else {
                    format!("https://{}", api)
                }
            }
            _ => default_target.to_string(),
        };
        Self { base }
    }

    pub fn from_query(query: &QueryParams, default_target: &str) -> Self {
        Self::resolve(query.get(API_PARAM), default_target)
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn generate_pdf_url(&self) -> String {
        format!("{}{}", self.base, GENERATE_PDF_PATH)
    }

    pub fn health_url(&self) -> String {
        format!("{}{}", self.base, HEALTH_PATH)
    }
}

impl Default for ConfigTarget {
    fn default() -> Self {
        Self::resolve(None, DEFAULT_TARGET)
    }
}

impl fmt::Display for ConfigTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_param_uses_default() {
        let target = ConfigTarget::resolve(None, DEFAULT_TARGET);
        assert_eq!(target.base(), "http://localhost:8000");
        assert_eq!(target, ConfigTarget::default());
    }

    #[test]
    fn test_empty_param_uses_default() {
        let target = ConfigTarget::resolve(Some(""), DEFAULT_TARGET);
        assert_eq!(target.base(), DEFAULT_TARGET);
    }

    #[test]
    fn test_bare_host_gets_https() {
        let target = ConfigTarget::resolve(Some("pdf.example.org"), DEFAULT_TARGET);
        assert_eq!(target.base(), "https://pdf.example.org");
    }

    #[test]
    fn test_scheme_kept_verbatim() {
        for api in ["http://10.0.0.5:8000", "https://pdf.example.org/api"] {
            assert_eq!(ConfigTarget::resolve(Some(api), DEFAULT_TARGET).base(), api);
        }
    }

    #[test]
    fn test_endpoints() {
        let target = ConfigTarget::resolve(Some("pdf.example.org"), DEFAULT_TARGET);
        assert_eq!(
            target.generate_pdf_url(),
            "https://pdf.example.org/generate-pdf"
        );
        assert_eq!(target.health_url(), "https://pdf.example.org/health");
    }

    #[test]
    fn test_from_query() {
        let query = QueryParams::parse("?api=render.internal%3A9000&webTitle=x");
        let target = ConfigTarget::from_query(&query, DEFAULT_TARGET);
        assert_eq!(target.to_string(), "https://render.internal:9000");
    }
}
