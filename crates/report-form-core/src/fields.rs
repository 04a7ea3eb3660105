//! Report form text fields
//!
//! Field values are truncated on every write, so the stored value never
//! exceeds its limit no matter how it got there (keystroke, paste, prefill).

use crate::config::FieldLimits;
use crate::error::ReportFormError;
use std::borrow::Cow;

/// The text fields of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldId {
    CommitteeName,
    DatetimeLocation,
    Organizer,
    Participants,
    ActivityContent,
    PdfTitle,
    ReviewerName,
}

impl FieldId {
    /// All fields, in the order they are sent to the service
    pub const ALL: [FieldId; 7] = [
        FieldId::CommitteeName,
        FieldId::DatetimeLocation,
        FieldId::Organizer,
        FieldId::Participants,
        FieldId::ActivityContent,
        FieldId::PdfTitle,
        FieldId::ReviewerName,
    ];

    /// Multipart part name
    pub fn form_name(self) -> &'static str {
        match self {
            FieldId::CommitteeName => "committee_name",
            FieldId::DatetimeLocation => "datetime_location",
            FieldId::Organizer => "organizer",
            FieldId::Participants => "participants",
            FieldId::ActivityContent => "activity_content",
            FieldId::PdfTitle => "pdf_title",
            FieldId::ReviewerName => "reviewer_name",
        }
    }

    /// DOM element id of the input
    pub fn element_id(self) -> &'static str {
        match self {
            FieldId::CommitteeName => "committeeName",
            FieldId::DatetimeLocation => "datetimeLocation",
            FieldId::Organizer => "organizer",
            FieldId::Participants => "participants",
            FieldId::ActivityContent => "activityContent",
            FieldId::PdfTitle => "pdfTitle",
            FieldId::ReviewerName => "reviewerName",
        }
    }

    /// Label shown to the user when the field is missing
    pub fn label(self) -> &'static str {
        match self {
            FieldId::CommitteeName => "위원회명",
            FieldId::DatetimeLocation => "일시/장소",
            FieldId::Organizer => "주최",
            FieldId::Participants => "참석자",
            FieldId::ActivityContent => "활동내용",
            FieldId::PdfTitle => "PDF 제목",
            FieldId::ReviewerName => "검토자",
        }
    }

    /// PDF title and reviewer are left out of the page's required check;
    /// the service still declares them as required form fields
    pub fn is_required(self) -> bool {
        !matches!(self, FieldId::PdfTitle | FieldId::ReviewerName)
    }

    pub fn max_chars(self, limits: &FieldLimits) -> Option<usize> {
        match self {
            FieldId::CommitteeName => Some(limits.committee_name),
            FieldId::Participants => Some(limits.participants),
            FieldId::ActivityContent => Some(limits.activity_content),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Cut `value` down to at most `max` characters
pub fn truncate_chars(value: &str, max: usize) -> Cow<'_, str> {
    match value.char_indices().nth(max) {
        Some((byte_idx, _)) => Cow::Owned(value[..byte_idx].to_string()),
        None => Cow::Borrowed(value),
    }
}

/// Current values of all text fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormFields {
    values: [String; 7],
    limits: FieldLimits,
}

impl FormFields {
    pub fn new(limits: FieldLimits) -> Self {
        Self {
            values: Default::default(),
            limits,
        }
    }

    pub fn get(&self, field: FieldId) -> &str {
        &self.values[field.index()]
    }

    /// Store a value, truncating it to the field limit.
    ///
    /// Returns the stored value so the caller can write it back to the input
    /// when truncation happened.
    pub fn set(&mut self, field: FieldId, value: &str) -> &str {
        let stored = match field.max_chars(&self.limits) {
            Some(max) => truncate_chars(value, max).into_owned(),
            None => value.to_string(),
        };
        self.values[field.index()] = stored;
        &self.values[field.index()]
    }

    pub fn clear(&mut self) {
        for value in &mut self.values {
            value.clear();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(String::is_empty)
    }

    /// Required fields that are blank after trimming
    pub fn missing_required(&self) -> Vec<FieldId> {
        FieldId::ALL
            .into_iter()
            .filter(|f| f.is_required() && self.get(*f).trim().is_empty())
            .collect()
    }

    pub fn check_required(&self) -> Result<(), ReportFormError> {
        let missing = self.missing_required();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ReportFormError::MissingRequired(
                missing.into_iter().map(FieldId::label).collect(),
            ))
        }
    }

    /// `(part name, value)` pairs in wire order
    pub fn parts(&self) -> Vec<(&'static str, &str)> {
        FieldId::ALL
            .into_iter()
            .map(|f| (f.form_name(), self.get(f)))
            .collect()
    }
}
