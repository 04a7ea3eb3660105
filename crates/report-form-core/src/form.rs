//! The report form model
//!
//! `ReportForm` holds everything the page shows: field values, the pending
//! attachment, the submit state, the banners and the headings. The browser
//! controller forwards DOM events to it, renders it back, and schedules the
//! [`FormTimer`]s it hands out.

use crate::attachment::{Attachment, FileIntake, IntakeSource};
use crate::config::FormConfig;
use crate::error::ReportFormError;
use crate::fields::{FieldId, FormFields};
use crate::prefill::PrefillPlan;
use crate::submission::{Banners, FormTimer, HealthOutcome, SubmissionState, SubmitOutcome};

/// Multipart content of one submission
#[derive(Debug)]
pub struct SubmissionPayload<'a, H> {
    /// Text parts in wire order
    pub parts: Vec<(&'static str, &'a str)>,
    /// Sent as the `image` part when present
    pub image: Option<&'a Attachment<H>>,
}

/// Multipart part name of the attachment
pub const IMAGE_PART: &str = "image";

#[derive(Debug, Clone)]
pub struct ReportForm<H = ()> {
    config: FormConfig,
    fields: FormFields,
    intake: FileIntake<H>,
    state: SubmissionState,
    banners: Banners,
    heading: Option<String>,
    subheading: Option<String>,
}

impl<H> ReportForm<H> {
    pub fn new(config: FormConfig) -> Self {
        Self {
            fields: FormFields::new(config.limits.clone()),
            intake: FileIntake::new(config.max_attachment_mib),
            state: SubmissionState::Idle,
            banners: Banners::default(),
            heading: None,
            subheading: None,
            config,
        }
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn intake(&self) -> &FileIntake<H> {
        &self.intake
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn banners(&self) -> &Banners {
        &self.banners
    }

    pub fn heading(&self) -> Option<&str> {
        self.heading.as_deref()
    }

    pub fn subheading(&self) -> Option<&str> {
        self.subheading.as_deref()
    }

    /// Loading indicator is shown exactly while a request is in flight
    pub fn is_loading(&self) -> bool {
        self.state.is_submitting()
    }

    pub fn submit_enabled(&self) -> bool {
        !self.state.is_submitting()
    }

    /// Record an input change; returns the value after truncation
    pub fn input(&mut self, field: FieldId, value: &str) -> &str {
        self.fields.set(field, value)
    }

    /// Offer a file from the picker or a drop.
    ///
    /// Errors leave the banner alone; report them with [`Self::show_error`].
    pub fn offer_file(
        &mut self,
        file: Option<Attachment<H>>,
        source: IntakeSource,
    ) -> Result<bool, ReportFormError> {
        self.intake.offer(file, source)
    }

    pub fn apply_prefill(&mut self, plan: &PrefillPlan) {
        plan.apply(&mut self.fields);
        if let Some(heading) = &plan.heading {
            self.heading = Some(heading.clone());
        }
        if let Some(subheading) = &plan.subheading {
            self.subheading = Some(subheading.clone());
        }
    }

    /// Show the error banner and return the timer that hides it
    pub fn show_error(&mut self, message: impl Into<String>) -> FormTimer {
        self.banners.show_error(message);
        FormTimer::HideError
    }

    /// Enter `Submitting` and hand out the payload to send.
    ///
    /// Refuses while a submission is already in flight and when a required
    /// field is blank. Banners are cleared in every case but the first.
    pub fn begin_submit(&mut self) -> Result<SubmissionPayload<'_, H>, ReportFormError> {
        if self.state.is_submitting() {
            tracing::warn!("Submit ignored, a submission is already in flight");
            return Err(ReportFormError::SubmissionInFlight);
        }

        self.banners.hide_all();
        self.fields.check_required()?;

        self.state = SubmissionState::Submitting;
        tracing::info!(
            with_image = self.intake.is_selected(),
            "Submitting report"
        );

        let parts = self.fields.parts();
        for (name, value) in &parts {
            tracing::debug!(part = name, value, "Form part");
        }

        Ok(SubmissionPayload {
            parts,
            image: self.intake.pending(),
        })
    }

    /// Leave `Submitting` and return the timers to schedule
    pub fn finish_submit(&mut self, outcome: SubmitOutcome) -> Vec<FormTimer> {
        match outcome.into_result() {
            Ok(file_name) => {
                tracing::info!(file_name = %file_name, "Report downloaded");
                self.state = SubmissionState::Success;
                self.banners.show_success();
                vec![FormTimer::HideSuccess, FormTimer::ResetForm]
            }
            Err(e) => {
                tracing::error!(error = %e, "Report submission failed");
                let message = e.to_string();
                self.state = SubmissionState::Error(message.clone());
                vec![self.show_error(message)]
            }
        }
    }

    /// Apply an elapsed timer
    pub fn fire(&mut self, timer: FormTimer) {
        match timer {
            FormTimer::HideSuccess => self.banners.hide_success(),
            FormTimer::HideError => {
                self.banners.hide_error();
                if matches!(self.state, SubmissionState::Error(_)) {
                    self.state = SubmissionState::Idle;
                }
            }
            FormTimer::ResetForm => self.reset(),
        }
    }

    /// Empty all fields, drop the attachment and hide the banners
    pub fn reset(&mut self) {
        self.fields.clear();
        self.intake.clear();
        self.banners.hide_all();
        if self.state == SubmissionState::Success {
            self.state = SubmissionState::Idle;
        }
    }

    /// Log the health check result; only an unreachable service is shown
    pub fn record_health(&mut self, outcome: HealthOutcome) -> Option<FormTimer> {
        match outcome {
            HealthOutcome::Healthy(status) => {
                tracing::info!(%status, "PDF service reachable");
                None
            }
            HealthOutcome::Unhealthy { status } => {
                tracing::warn!(status, "PDF service health check failed");
                None
            }
            HealthOutcome::Unreachable(reason) => {
                tracing::error!(reason = %reason, "PDF service unreachable");
                Some(self.show_error(ReportFormError::ServiceUnreachable(reason).to_string()))
            }
        }
    }
}
