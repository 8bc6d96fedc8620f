//! Registration wizard: three gated steps, an in-flight guard around
//! submission, and the HTTP transport that delivers the result.

use async_trait::async_trait;
use shared::{
    catalog::{self, CatalogEntry},
    domain::{PaymentProof, RegistrationSubmission, SubmissionField, DEFAULT_ROLE},
};
use tracing::{debug, info, warn};

mod client;
pub mod error;

pub use client::IntakeClient;
pub use error::{ClientError, FormError};

pub const SUCCESS_TITLE: &str = "Registration Submitted!";
pub const SUCCESS_DESCRIPTION: &str =
    "Thank you for registering. We'll contact you shortly with confirmation.";
pub const FAILURE_TITLE: &str = "Registration failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    PersonalInfo,
    Committee,
    Payment,
}

impl Step {
    pub const ALL: [Step; 3] = [Step::PersonalInfo, Step::Committee, Step::Payment];

    pub fn number(self) -> u8 {
        match self {
            Step::PersonalInfo => 1,
            Step::Committee => 2,
            Step::Payment => 3,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::PersonalInfo => "Personal Info",
            Step::Committee => "Committee",
            Step::Payment => "Payment",
        }
    }

    /// Fields that must be non-empty before leaving this step forwards.
    pub fn required_fields(self) -> &'static [SubmissionField] {
        match self {
            Step::PersonalInfo => &SubmissionField::PERSONAL,
            Step::Committee => &SubmissionField::COMMITTEE,
            Step::Payment => &[],
        }
    }

    fn next(self) -> Option<Step> {
        match self {
            Step::PersonalInfo => Some(Step::Committee),
            Step::Committee => Some(Step::Payment),
            Step::Payment => None,
        }
    }

    fn previous(self) -> Option<Step> {
        match self {
            Step::PersonalInfo => None,
            Step::Committee => Some(Step::PersonalInfo),
            Step::Payment => Some(Step::Committee),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Submitted,
    Failed { message: String },
}

impl Notification {
    pub fn title(&self) -> &str {
        match self {
            Notification::Submitted => SUCCESS_TITLE,
            Notification::Failed { .. } => FAILURE_TITLE,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Notification::Submitted => SUCCESS_DESCRIPTION,
            Notification::Failed { message } => message.as_str(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Notification::Submitted)
    }
}

#[async_trait]
pub trait SubmissionTransport: Send + Sync {
    async fn submit(&self, submission: &RegistrationSubmission) -> Result<(), ClientError>;
}

/// In-memory wizard state.
///
/// A successful submission is reported through [`Notification::Submitted`]
/// and the form immediately starts over on the first step; a failed one
/// leaves every value in place on the payment step so the user can retry.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    step: Step,
    values: RegistrationSubmission,
    role: String,
    payment_proof: Option<PaymentProof>,
    in_flight: bool,
    notification: Option<Notification>,
}

impl Default for RegistrationForm {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationForm {
    pub fn new() -> Self {
        Self {
            step: Step::PersonalInfo,
            values: RegistrationSubmission::default(),
            role: DEFAULT_ROLE.to_string(),
            payment_proof: None,
            in_flight: false,
            notification: None,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn values(&self) -> &RegistrationSubmission {
        &self.values
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn payment_proof(&self) -> Option<&PaymentProof> {
        self.payment_proof.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn take_notification(&mut self) -> Option<Notification> {
        self.notification.take()
    }

    pub fn experience_options() -> &'static [CatalogEntry] {
        catalog::EXPERIENCE_LEVELS
    }

    pub fn committee_options() -> &'static [CatalogEntry] {
        catalog::COMMITTEES
    }

    /// Sets a free-text field. Only the fields shown on the current step are
    /// editable; experience and committee go through their `select_*` calls.
    pub fn set_field(
        &mut self,
        field: SubmissionField,
        value: impl Into<String>,
    ) -> Result<(), FormError> {
        self.ensure_idle()?;
        if self.step != Step::PersonalInfo || !SubmissionField::PERSONAL.contains(&field) {
            return Err(FormError::FieldNotOnStep {
                field,
                step: self.step.number(),
            });
        }
        *self.values.field_mut(field) = value.into();
        Ok(())
    }

    pub fn select_experience(&mut self, code: &str) -> Result<(), FormError> {
        self.select(SubmissionField::Experience, catalog::EXPERIENCE_LEVELS, "experience", code)
    }

    pub fn select_committee(&mut self, code: &str) -> Result<(), FormError> {
        self.select(SubmissionField::Committee, catalog::COMMITTEES, "committee", code)
    }

    fn select(
        &mut self,
        field: SubmissionField,
        options: &[CatalogEntry],
        kind: &'static str,
        code: &str,
    ) -> Result<(), FormError> {
        self.ensure_idle()?;
        if self.step != Step::Committee {
            return Err(FormError::FieldNotOnStep {
                field,
                step: self.step.number(),
            });
        }
        if !catalog::contains(options, code) {
            return Err(FormError::UnknownOption {
                kind,
                code: code.to_string(),
            });
        }
        *self.values.field_mut(field) = code.to_string();
        Ok(())
    }

    pub fn attach_payment_proof(&mut self, proof: PaymentProof) -> Result<(), FormError> {
        self.ensure_idle()?;
        if self.step != Step::Payment {
            return Err(FormError::NotOnPaymentStep);
        }
        debug!(filename = %proof.filename, "payment proof attached");
        self.payment_proof = Some(proof);
        Ok(())
    }

    pub fn clear_payment_proof(&mut self) -> Result<(), FormError> {
        self.ensure_idle()?;
        self.payment_proof = None;
        Ok(())
    }

    /// The form is frozen while a submission is pending, so a failed attempt
    /// returns to exactly the values that passed both gates.
    fn ensure_idle(&self) -> Result<(), FormError> {
        if self.in_flight {
            return Err(FormError::SubmitInFlight);
        }
        Ok(())
    }

    pub fn can_proceed_step1(&self) -> bool {
        self.missing_for(Step::PersonalInfo).is_empty()
    }

    pub fn can_proceed_step2(&self) -> bool {
        self.missing_for(Step::Committee).is_empty()
    }

    fn missing_for(&self, step: Step) -> Vec<SubmissionField> {
        self.values.missing_among(step.required_fields())
    }

    pub fn advance(&mut self) -> Result<Step, FormError> {
        self.ensure_idle()?;
        let next = self.step.next().ok_or(FormError::NoNextStep)?;
        let missing = self.missing_for(self.step);
        if !missing.is_empty() {
            return Err(FormError::StepIncomplete {
                step: self.step.number(),
                missing,
            });
        }
        self.step = next;
        Ok(next)
    }

    pub fn back(&mut self) -> Result<Step, FormError> {
        self.ensure_idle()?;
        let previous = self.step.previous().ok_or(FormError::NoPreviousStep)?;
        self.step = previous;
        Ok(previous)
    }

    /// Marks a submission as in flight and returns the payload to send.
    /// Fails while another submission is still pending.
    pub fn begin_submit(&mut self) -> Result<RegistrationSubmission, FormError> {
        if self.step != Step::Payment {
            return Err(FormError::NotOnPaymentStep);
        }
        if self.in_flight {
            return Err(FormError::SubmitInFlight);
        }
        self.in_flight = true;
        self.notification = None;
        Ok(self.values.clone())
    }

    pub fn finish_submit(
        &mut self,
        outcome: Result<(), ClientError>,
    ) -> Result<Notification, FormError> {
        if !self.in_flight {
            return Err(FormError::NothingInFlight);
        }
        let notification = match outcome {
            Ok(()) => {
                info!(committee = %self.values.committee, "registration submitted");
                *self = Self::new();
                Notification::Submitted
            }
            Err(err) => {
                warn!(error = %err, "registration submission failed");
                self.in_flight = false;
                Notification::Failed {
                    message: err.to_string(),
                }
            }
        };
        self.notification = Some(notification.clone());
        Ok(notification)
    }

    pub async fn submit(
        &mut self,
        transport: &dyn SubmissionTransport,
    ) -> Result<Notification, FormError> {
        let payload = self.begin_submit()?;
        let outcome = transport.submit(&payload).await;
        self.finish_submit(outcome)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
