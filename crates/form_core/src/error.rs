use shared::domain::SubmissionField;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("step {step} is incomplete; missing {missing:?}")]
    StepIncomplete {
        step: u8,
        missing: Vec<SubmissionField>,
    },
    #[error("{field} is not editable on step {step}")]
    FieldNotOnStep { field: SubmissionField, step: u8 },
    #[error("'{code}' is not an offered {kind} option")]
    UnknownOption { kind: &'static str, code: String },
    #[error("already on the first step")]
    NoPreviousStep,
    #[error("the payment step has no next step; submit instead")]
    NoNextStep,
    #[error("only available on the payment step")]
    NotOnPaymentStep,
    #[error("a registration is already being submitted")]
    SubmitInFlight,
    #[error("no registration is being submitted")]
    NothingInFlight,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("registration was rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("intake request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected intake response: {0}")]
    UnexpectedResponse(String),
}
