//! Field and heading prefill from the page URL

use crate::fields::{FieldId, FormFields};
use crate::query::{decode_uri_component, QueryParams};

pub const COMMITTEE_NAME_PARAM: &str = "committeeName";
pub const ORGANIZER_PARAM: &str = "organizer";
pub const PARTICIPANTS_PARAM: &str = "participants";
pub const PDF_TITLE_PARAM: &str = "pdfTitle";
pub const REVIEWER_NAME_PARAM: &str = "reviewerName";
pub const WEB_TITLE_PARAM: &str = "webTitle";
pub const LEGACY_TITLE_PARAM: &str = "title";
pub const WEB_SUBTITLE_PARAM: &str = "webSubTitle";

/// Everything the page URL asks to prefill
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefillPlan {
    pub fields: Vec<(FieldId, String)>,
    pub heading: Option<String>,
    pub subheading: Option<String>,
}

impl PrefillPlan {
    /// Build the plan from parsed query parameters.
    ///
    /// `committeeName`, `organizer` and `participants` travel as a group:
    /// when `committeeName` is present all three are written, and a missing
    /// companion clears its field.
    pub fn from_query(query: &QueryParams, heading_marker: &str) -> Self {
        let mut plan = PrefillPlan::default();

        if let Some(pdf_title) = query.get_non_empty(PDF_TITLE_PARAM) {
            plan.fields.push((FieldId::PdfTitle, decode_param(pdf_title)));
        }

        if let Some(reviewer) = query.get_non_empty(REVIEWER_NAME_PARAM) {
            plan.fields
                .push((FieldId::ReviewerName, decode_param(reviewer)));
        }

        plan.subheading = query.get_non_empty(WEB_SUBTITLE_PARAM).map(decode_param);

        plan.heading = query
            .get_non_empty(WEB_TITLE_PARAM)
            .or_else(|| query.get_non_empty(LEGACY_TITLE_PARAM))
            .map(|title| with_heading_marker(&decode_param(title), heading_marker));

        if let Some(committee) = query.get_non_empty(COMMITTEE_NAME_PARAM) {
            let companion = |key: &str| query.get(key).map(decode_param).unwrap_or_default();
            plan.fields
                .push((FieldId::CommitteeName, decode_param(committee)));
            plan.fields
                .push((FieldId::Organizer, companion(ORGANIZER_PARAM)));
            plan.fields
                .push((FieldId::Participants, companion(PARTICIPANTS_PARAM)));
        }

        plan
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.heading.is_none() && self.subheading.is_none()
    }

    /// Write the planned values into `fields`, with normal truncation
    pub fn apply(&self, fields: &mut FormFields) {
        for (field, value) in &self.fields {
            fields.set(*field, value);
        }
    }
}

/// Second decoding pass over an already query-decoded value.
///
/// A value the strict decoder refuses is kept as it came out of the query
/// string.
fn decode_param(value: &str) -> String {
    match decode_uri_component(value) {
        Some(decoded) => decoded.into_owned(),
        None => {
            tracing::warn!(value, "Query value is not a valid URI component, using it as-is");
            value.to_string()
        }
    }
}

/// Prefix `title` with the heading marker unless it already starts with it
pub fn with_heading_marker(title: &str, marker: &str) -> String {
    if title.starts_with(marker) {
        title.to_string()
    } else {
        format!("{} {}", marker, title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FieldLimits, HEADING_MARKER};
    use pretty_assertions::assert_eq;

    fn plan(search: &str) -> PrefillPlan {
        PrefillPlan::from_query(&QueryParams::parse(search), HEADING_MARKER)
    }

    #[test]
    fn test_committee_group_prefill() {
        let mut fields = FormFields::new(FieldLimits::default());
        plan("?committeeName=Acme&organizer=Bob&participants=Five").apply(&mut fields);
        assert_eq!(fields.get(FieldId::CommitteeName), "Acme");
        assert_eq!(fields.get(FieldId::Organizer), "Bob");
        assert_eq!(fields.get(FieldId::Participants), "Five");
    }

    #[test]
    fn test_committee_alone_clears_companions() {
        let mut fields = FormFields::new(FieldLimits::default());
        fields.set(FieldId::Organizer, "typed earlier");
        plan("?committeeName=Acme").apply(&mut fields);
        assert_eq!(fields.get(FieldId::CommitteeName), "Acme");
        assert_eq!(fields.get(FieldId::Organizer), "");
        assert_eq!(fields.get(FieldId::Participants), "");
    }

    #[test]
    fn test_companions_ignored_without_committee() {
        let plan = plan("?organizer=Bob&participants=Five");
        assert!(plan.fields.is_empty());
    }

    #[test]
    fn test_heading_gets_marker() {
        assert_eq!(plan("?webTitle=Report").heading.as_deref(), Some("📄 Report"));
    }

    #[test]
    fn test_heading_marker_not_duplicated() {
        assert_eq!(
            plan("?webTitle=%F0%9F%93%84%20Report").heading.as_deref(),
            Some("📄 Report")
        );
    }

    #[test]
    fn test_legacy_title_alias() {
        assert_eq!(plan("?title=Minutes").heading.as_deref(), Some("📄 Minutes"));
        assert_eq!(
            plan("?title=Old&webTitle=New").heading.as_deref(),
            Some("📄 New")
        );
    }

    #[test]
    fn test_title_reviewer_and_subtitle() {
        let plan = plan("?pdfTitle=%EB%AA%A8%EC%9E%84&reviewerName=Kim&webSubTitle=Q2+review");
        assert_eq!(
            plan.fields,
            vec![
                (FieldId::PdfTitle, "모임".to_string()),
                (FieldId::ReviewerName, "Kim".to_string()),
            ]
        );
        assert_eq!(plan.subheading.as_deref(), Some("Q2 review"));
        assert_eq!(plan.heading, None);
    }

    #[test]
    fn test_double_encoded_value_decodes_twice() {
        // %2520 -> "%20" after the query pass -> " " after the second pass
        assert_eq!(
            plan("?webSubTitle=a%2520b").subheading.as_deref(),
            Some("a b")
        );
    }

    #[test]
    fn test_malformed_second_pass_keeps_value() {
        // %25 -> "%" which is not a valid URI component on its own
        assert_eq!(
            plan("?webSubTitle=100%25").subheading.as_deref(),
            Some("100%")
        );
    }

    #[test]
    fn test_prefill_respects_limits() {
        let long = "a".repeat(80);
        let mut fields = FormFields::new(FieldLimits::default());
        plan(&format!("?committeeName={}", long)).apply(&mut fields);
        assert_eq!(fields.get(FieldId::CommitteeName).len(), 50);
    }

    #[test]
    fn test_empty_query_plans_nothing() {
        assert!(plan("").is_empty());
        assert!(plan("?committeeName=&webTitle=").is_empty());
    }
}
