use thiserror::Error;

/// Errors surfaced by the report form.
///
/// The `Display` text of every variant is what the error banner shows
/// (after the `❌` prefix), so messages are written for the end user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReportFormError {
    #[error("파일 크기는 {limit_mib}MB를 초과할 수 없습니다.")]
    FileTooLarge { size_mib: f64, limit_mib: f64 },

    #[error("이미지 파일만 업로드 가능합니다.")]
    NotAnImage { mime_type: String },

    #[error("필수 항목을 입력해주세요: {}", .0.join(", "))]
    MissingRequired(Vec<&'static str>),

    #[error("이미 PDF를 생성하는 중입니다.")]
    SubmissionInFlight,

    /// The service answered with a non-success status
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The request never completed
    #[error("{0}")]
    Network(String),

    #[error("서버에 연결할 수 없습니다. 서버가 실행 중인지 확인하세요.")]
    ServiceUnreachable(String),

    #[error("Invalid form configuration: {0}")]
    InvalidConfig(String),
}

impl ReportFormError {
    /// Validation errors are raised locally and never reach the network
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ReportFormError::FileTooLarge { .. }
                | ReportFormError::NotAnImage { .. }
                | ReportFormError::MissingRequired(_)
        )
    }
}
