//! Image attachment intake
//!
//! Files reach the form two ways: the file picker and a drop on the file
//! label. The picker's `accept` filter already restricts the MIME type, so
//! only dropped files are type-checked here. Both paths enforce the size
//! limit.

use crate::error::ReportFormError;

/// Label text shown while no file is selected
pub const DEFAULT_PROMPT: &str = "클릭하여 이미지 선택 또는 드래그 앤 드롭";

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// Size in MiB rounded to two decimals, as shown on the label
pub fn size_in_mib(size_bytes: u64) -> f64 {
    (size_bytes as f64 / BYTES_PER_MIB * 100.0).round() / 100.0
}

/// A candidate or accepted file.
///
/// `handle` carries the platform file object (a `web_sys::File` in the
/// browser) so the accepted file can be attached to the upload as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment<H = ()> {
    pub name: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub handle: H,
}

impl Attachment<()> {
    pub fn new(name: impl Into<String>, size_bytes: u64, mime_type: impl Into<String>) -> Self {
        Self::with_handle(name, size_bytes, mime_type, ())
    }
}

impl<H> Attachment<H> {
    pub fn with_handle(
        name: impl Into<String>,
        size_bytes: u64,
        mime_type: impl Into<String>,
        handle: H,
    ) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            mime_type: mime_type.into(),
            handle,
        }
    }

    pub fn size_mib(&self) -> f64 {
        size_in_mib(self.size_bytes)
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// Label text once the file is accepted
    pub fn label_text(&self) -> String {
        format!("선택된 파일: {} ({:.2}MB)", self.name, self.size_mib())
    }

    fn check_size(&self, limit_mib: f64) -> Result<(), ReportFormError> {
        let size_mib = self.size_mib();
        if size_mib > limit_mib {
            return Err(ReportFormError::FileTooLarge {
                size_mib,
                limit_mib,
            });
        }
        Ok(())
    }
}

/// How a file reached the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeSource {
    Picker,
    Drop,
}

/// Drag gesture phases over the file label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Enter,
    Over,
    Leave,
    Drop,
}

impl DragPhase {
    pub fn event_type(self) -> &'static str {
        match self {
            DragPhase::Enter => "dragenter",
            DragPhase::Over => "dragover",
            DragPhase::Leave => "dragleave",
            DragPhase::Drop => "drop",
        }
    }

    /// Whether the label is highlighted after this phase
    pub fn highlights(self) -> bool {
        matches!(self, DragPhase::Enter | DragPhase::Over)
    }
}

/// Label styling for the drop target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropZoneStyle {
    pub background: &'static str,
    pub border_color: &'static str,
}

impl DropZoneStyle {
    pub const HIGHLIGHTED: DropZoneStyle = DropZoneStyle {
        background: "#e7f1ff",
        border_color: "#667eea",
    };

    pub const NORMAL: DropZoneStyle = DropZoneStyle {
        background: "#f8f9fa",
        border_color: "#dee2e6",
    };

    pub fn for_phase(phase: DragPhase) -> DropZoneStyle {
        if phase.highlights() {
            DropZoneStyle::HIGHLIGHTED
        } else {
            DropZoneStyle::NORMAL
        }
    }
}

/// The single pending attachment and what its label shows
#[derive(Debug, Clone)]
pub struct FileIntake<H = ()> {
    pending: Option<Attachment<H>>,
    limit_mib: f64,
}

impl<H> FileIntake<H> {
    pub fn new(limit_mib: f64) -> Self {
        Self {
            pending: None,
            limit_mib,
        }
    }

    pub fn pending(&self) -> Option<&Attachment<H>> {
        self.pending.as_ref()
    }

    pub fn is_selected(&self) -> bool {
        self.pending.is_some()
    }

    pub fn label_text(&self) -> String {
        match &self.pending {
            Some(file) => file.label_text(),
            None => DEFAULT_PROMPT.to_string(),
        }
    }

    /// Offer a file from either path.
    ///
    /// Returns `Ok(true)` when the pending attachment changed. A rejected
    /// picker selection clears the pending attachment; a rejected drop
    /// leaves it as it was.
    pub fn offer(
        &mut self,
        file: Option<Attachment<H>>,
        source: IntakeSource,
    ) -> Result<bool, ReportFormError> {
        let Some(file) = file else {
            return Ok(match source {
                IntakeSource::Picker => self.pending.take().is_some(),
                IntakeSource::Drop => false,
            });
        };

        if source == IntakeSource::Drop && !file.is_image() {
            tracing::debug!(name = %file.name, mime = %file.mime_type, "Rejected non-image drop");
            return Err(ReportFormError::NotAnImage {
                mime_type: file.mime_type,
            });
        }

        if let Err(e) = file.check_size(self.limit_mib) {
            tracing::debug!(name = %file.name, size_bytes = file.size_bytes, "Rejected oversized file");
            if source == IntakeSource::Picker {
                self.pending = None;
            }
            return Err(e);
        }

        tracing::debug!(name = %file.name, size_bytes = file.size_bytes, ?source, "Attachment accepted");
        self.pending = Some(file);
        Ok(true)
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: any file over the limit is rejected on both paths
        #[test]
        fn oversize_always_rejected(extra in 11u64..(64 * 1024 * 1024)) {
            let size = 10 * 1024 * 1024 + extra * 1024;
            for source in [IntakeSource::Picker, IntakeSource::Drop] {
                let mut intake = FileIntake::new(10.0);
                let file = Attachment::new("big.png", size, "image/png");
                prop_assert!(intake.offer(Some(file), source).is_err());
                prop_assert!(intake.pending().is_none());
            }
        }

        /// Property: dropped files without an image MIME type are rejected
        #[test]
        fn non_image_drop_rejected(mime in "(text|application|audio|video)/[a-z]{1,10}") {
            let mut intake = FileIntake::new(10.0);
            let file = Attachment::new("file", 1024, mime);
            prop_assert!(intake.offer(Some(file), IntakeSource::Drop).is_err());
            prop_assert!(intake.pending().is_none());
        }
    }
}
