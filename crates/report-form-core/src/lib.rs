//! Report form core
//!
//! Platform-independent model behind the report submission page: field
//! limits, image intake rules, service target resolution, URL prefill and
//! the submit/banner state machine.
//!
//! The browser crate (`report-form-wasm`) owns the DOM and the network; it
//! forwards every event to [`ReportForm`] and renders the result, so all
//! behaviour here is testable with plain `cargo test`.

pub mod attachment;
pub mod config;
pub mod error;
pub mod fields;
pub mod form;
pub mod prefill;
pub mod query;
pub mod submission;
pub mod target;

pub use attachment::{
    size_in_mib, Attachment, DragPhase, DropZoneStyle, FileIntake, IntakeSource, DEFAULT_PROMPT,
};
pub use config::{FieldLimits, FormConfig, DEFAULT_TARGET, HEADING_MARKER};
pub use error::ReportFormError;
pub use fields::{truncate_chars, FieldId, FormFields};
pub use form::{ReportForm, SubmissionPayload, IMAGE_PART};
pub use prefill::{with_heading_marker, PrefillPlan};
pub use query::{decode_uri_component, QueryParams};
pub use submission::{
    download_file_name, rejection_message, Banners, FormTimer, HealthOutcome, SubmissionState,
    SubmitOutcome,
};
pub use target::ConfigTarget;

/// Everything a page load resolves from its query string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLoad {
    pub target: ConfigTarget,
    pub prefill: PrefillPlan,
}

impl PageLoad {
    /// Resolve the service target and the prefill plan from `location.search`
    pub fn from_search(search: &str, config: &FormConfig) -> Self {
        let query = QueryParams::parse(search);
        Self {
            target: ConfigTarget::from_query(&query, &config.default_target),
            prefill: PrefillPlan::from_query(&query, &config.heading_marker),
        }
    }
}
