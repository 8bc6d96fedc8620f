use mailer::MailerError;
use shared::{
    domain::SubmissionField,
    error::{ApiError, ErrorCode},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("RESEND_API_KEY is not configured")]
    Configuration,
    #[error("invalid JSON body: {0}")]
    Parse(#[from] serde_json::Error),
    /// The list of fields is kept for logs; callers only see the generic message.
    #[error("Missing required fields")]
    Validation { missing: Vec<SubmissionField> },
    #[error("Email sending failed: {body}")]
    Upstream { status: u16, body: String },
    #[error("email API request failed: {0}")]
    Transport(String),
}

impl IntakeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            IntakeError::Configuration => ErrorCode::Configuration,
            IntakeError::Parse(_) => ErrorCode::Parse,
            IntakeError::Validation { .. } => ErrorCode::Validation,
            IntakeError::Upstream { .. } | IntakeError::Transport(_) => ErrorCode::Upstream,
        }
    }

    pub fn to_api_error(&self) -> ApiError {
        ApiError::new(self.code(), self.to_string())
    }
}

impl From<MailerError> for IntakeError {
    fn from(value: MailerError) -> Self {
        match value {
            MailerError::Rejected { status, body } => IntakeError::Upstream { status, body },
            MailerError::Transport(err) => IntakeError::Transport(err.to_string()),
        }
    }
}
