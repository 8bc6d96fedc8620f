use std::sync::Arc;

use chrono::Utc;
use mailer::{EmailSender, OutboundEmail};
use shared::{domain::RegistrationSubmission, protocol::SubmissionAccepted};
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

mod error;
pub mod template;

pub use error::IntakeError;

pub const DEFAULT_SENDER: &str = "OrdaMUN Registration <onboarding@resend.dev>";
pub const DEFAULT_ORGANIZER: &str = "registration@ordamun.kz";

/// Fixed addressing for organizer notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub from: String,
    pub organizer: String,
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            from: DEFAULT_SENDER.to_string(),
            organizer: DEFAULT_ORGANIZER.to_string(),
        }
    }
}

/// Everything one intake call needs. `mailer` is `None` when no email
/// credential was configured; submissions then fail with
/// [`IntakeError::Configuration`].
#[derive(Clone)]
pub struct IntakeContext {
    pub mailer: Option<Arc<dyn EmailSender>>,
    pub envelope: Envelope,
}

impl IntakeContext {
    pub fn new(mailer: Arc<dyn EmailSender>, envelope: Envelope) -> Self {
        Self {
            mailer: Some(mailer),
            envelope,
        }
    }

    pub fn unconfigured(envelope: Envelope) -> Self {
        Self {
            mailer: None,
            envelope,
        }
    }
}

pub fn validate(submission: &RegistrationSubmission) -> Result<(), IntakeError> {
    let missing = submission.missing_fields();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(IntakeError::Validation { missing })
    }
}

pub fn compose_email(envelope: &Envelope, submission: &RegistrationSubmission) -> OutboundEmail {
    OutboundEmail {
        from: envelope.from.clone(),
        to: vec![envelope.organizer.clone()],
        subject: template::subject_line(submission),
        html: template::render_notification(submission, Utc::now()),
    }
}

/// Runs one submission through parse, validation, rendering and dispatch.
/// Exactly one email is sent on success; nothing is retried.
pub async fn submit_registration(
    ctx: &IntakeContext,
    body: &[u8],
) -> Result<SubmissionAccepted, IntakeError> {
    let span = info_span!("registration", submission_id = %Uuid::new_v4());
    async move {
        let result = process(ctx, body).await;
        match &result {
            Ok(_) => info!("registration email sent"),
            Err(IntakeError::Validation { missing }) => {
                let missing: Vec<&str> = missing.iter().map(|field| field.wire_name()).collect();
                error!(?missing, "registration rejected");
            }
            Err(err) => error!(error = %err, "registration failed"),
        }
        result
    }
    .instrument(span)
    .await
}

async fn process(ctx: &IntakeContext, body: &[u8]) -> Result<SubmissionAccepted, IntakeError> {
    let mailer = ctx.mailer.as_ref().ok_or(IntakeError::Configuration)?;
    let submission: RegistrationSubmission = serde_json::from_slice(body)?;
    validate(&submission)?;

    let email = compose_email(&ctx.envelope, &submission);
    mailer.send(&email).await?;
    Ok(SubmissionAccepted::ok())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
