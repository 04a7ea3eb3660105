//! Submission state, outcomes and banners

use crate::config::FormConfig;
use crate::error::ReportFormError;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Shown when the service rejects a request without a readable message
pub const GENERIC_REJECTION: &str = "PDF 생성 실패";

/// Shown when the request fails without a usable error message
pub const GENERIC_FAILURE: &str = "PDF 생성 중 오류가 발생했습니다.";

/// Prefix of every error banner
pub const ERROR_BANNER_PREFIX: &str = "❌";

/// Where the form is in its submit cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Success,
    Error(String),
}

impl SubmissionState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmissionState::Submitting)
    }
}

/// How a single submission ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// PDF received and handed to the browser as a download
    Downloaded { file_name: String },
    /// Service answered with a non-success status
    Rejected { status: u16, message: String },
    /// Request never completed
    NetworkFailed(String),
}

impl SubmitOutcome {
    /// Build a rejection from the status and raw response body
    pub fn rejected(status: u16, body: &str) -> Self {
        SubmitOutcome::Rejected {
            status,
            message: rejection_message(body),
        }
    }

    /// Build a network failure from whatever message the platform gave us
    pub fn network_failed(message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE.to_string());
        SubmitOutcome::NetworkFailed(message)
    }

    pub fn into_result(self) -> Result<String, ReportFormError> {
        match self {
            SubmitOutcome::Downloaded { file_name } => Ok(file_name),
            SubmitOutcome::Rejected { status, message } => {
                Err(ReportFormError::Rejected { status, message })
            }
            SubmitOutcome::NetworkFailed(message) => Err(ReportFormError::Network(message)),
        }
    }
}

/// Name of the downloaded report
pub fn download_file_name(epoch_millis: u64) -> String {
    format!("report_{}.pdf", epoch_millis)
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
}

/// Extract the user-facing message from an error response body.
///
/// The service reports errors as `{"detail": "..."}`. Request validation
/// failures carry a list of `{"msg": ...}` entries instead, which are
/// joined. Anything else yields [`GENERIC_REJECTION`].
pub fn rejection_message(body: &str) -> String {
    let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) else {
        return GENERIC_REJECTION.to_string();
    };

    [parsed.detail, parsed.message]
        .into_iter()
        .flatten()
        .find_map(|value| message_from_value(&value))
        .unwrap_or_else(|| GENERIC_REJECTION.to_string())
}

fn message_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}

/// Result of the load-time health check
#[derive(Debug, Clone, PartialEq)]
pub enum HealthOutcome {
    Healthy(Value),
    Unhealthy { status: u16 },
    Unreachable(String),
}

/// Visibility of the two transient banners
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Banners {
    success_visible: bool,
    error: Option<String>,
}

impl Banners {
    pub fn success_visible(&self) -> bool {
        self.success_visible
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Banner text as rendered, with the error prefix
    pub fn error_text(&self) -> Option<String> {
        self.error
            .as_ref()
            .map(|message| format!("{} {}", ERROR_BANNER_PREFIX, message))
    }

    pub fn show_success(&mut self) {
        self.success_visible = true;
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn hide_success(&mut self) {
        self.success_visible = false;
    }

    pub fn hide_error(&mut self) {
        self.error = None;
    }

    pub fn hide_all(&mut self) {
        self.hide_success();
        self.hide_error();
    }
}

/// Fire-once timers the form asks its host to schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormTimer {
    HideSuccess,
    HideError,
    ResetForm,
}

impl FormTimer {
    pub fn delay(self, config: &FormConfig) -> Duration {
        match self {
            FormTimer::HideSuccess => config.success_banner_delay(),
            FormTimer::HideError => config.error_banner_delay(),
            FormTimer::ResetForm => config.reset_delay(),
        }
    }
}
