//! Form configuration
//!
//! Every value has a default matching the stock report page, so the page
//! can mount without any configuration at all. A JSON object with any
//! subset of the keys overrides just those keys.

use crate::error::ReportFormError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fallback service location when the page URL carries no `api` parameter
pub const DEFAULT_TARGET: &str = "http://localhost:8000";

/// Marker every page heading starts with
pub const HEADING_MARKER: &str = "📄";

/// Per-field character limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldLimits {
    pub committee_name: usize,
    pub participants: usize,
    pub activity_content: usize,
}

impl Default for FieldLimits {
    fn default() -> Self {
        Self {
            committee_name: 50,
            participants: 100,
            activity_content: 2000,
        }
    }
}

/// Configuration for a mounted report form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    pub limits: FieldLimits,
    /// Largest accepted attachment, in MiB
    pub max_attachment_mib: f64,
    pub success_banner_ms: u64,
    pub error_banner_ms: u64,
    /// Delay between a successful download and the form reset
    pub reset_delay_ms: u64,
    pub default_target: String,
    pub heading_marker: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            limits: FieldLimits::default(),
            max_attachment_mib: 10.0,
            success_banner_ms: 3000,
            error_banner_ms: 5000,
            reset_delay_ms: 3000,
            default_target: DEFAULT_TARGET.to_string(),
            heading_marker: HEADING_MARKER.to_string(),
        }
    }
}

impl FormConfig {
    /// Parse a (possibly partial) JSON configuration and validate it
    pub fn from_json(json: &str) -> Result<Self, ReportFormError> {
        let config: FormConfig = serde_json::from_str(json)
            .map_err(|e| ReportFormError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReportFormError> {
        let limits = &self.limits;
        if limits.committee_name == 0 || limits.participants == 0 || limits.activity_content == 0
        {
            return Err(ReportFormError::InvalidConfig(
                "field limits must be greater than zero".to_string(),
            ));
        }

        if self.max_attachment_mib.is_nan() || self.max_attachment_mib <= 0.0 {
            return Err(ReportFormError::InvalidConfig(format!(
                "max_attachment_mib must be positive, got {}",
                self.max_attachment_mib
            )));
        }

        if self.default_target.trim().is_empty() {
            return Err(ReportFormError::InvalidConfig(
                "default_target must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn success_banner_delay(&self) -> Duration {
        Duration::from_millis(self.success_banner_ms)
    }

    pub fn error_banner_delay(&self) -> Duration {
        Duration::from_millis(self.error_banner_ms)
    }

    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }
}
