use super::*;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

struct StubTransport {
    calls: Arc<AtomicUsize>,
    fail_with: Option<(u16, String)>,
}

impl StubTransport {
    fn ok() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            fail_with: None,
        }
    }

    fn failing(status: u16, message: &str) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            fail_with: Some((status, message.to_string())),
        }
    }
}

#[async_trait]
impl SubmissionTransport for StubTransport {
    async fn submit(&self, submission: &RegistrationSubmission) -> Result<(), ClientError> {
        assert!(submission.is_complete(), "transmitted an incomplete payload");
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.fail_with {
            None => Ok(()),
            Some((status, message)) => Err(ClientError::Rejected {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}

fn fill_personal(form: &mut RegistrationForm) {
    form.set_field(SubmissionField::FullName, "Aigerim K.").expect("name");
    form.set_field(SubmissionField::Email, "a@k.kz").expect("email");
    form.set_field(SubmissionField::Phone, "+77001234567").expect("phone");
    form.set_field(SubmissionField::School, "NU").expect("school");
    form.set_field(SubmissionField::City, "Almaty").expect("city");
}

fn form_on_payment_step() -> RegistrationForm {
    let mut form = RegistrationForm::new();
    fill_personal(&mut form);
    form.advance().expect("to committee");
    form.select_experience("1-2").expect("experience");
    form.select_committee("unep").expect("committee");
    form.advance().expect("to payment");
    form
}

#[test]
fn starts_on_personal_info_with_delegate_role() {
    let form = RegistrationForm::new();
    assert_eq!(form.step(), Step::PersonalInfo);
    assert_eq!(form.step().number(), 1);
    assert_eq!(form.role(), "delegate");
    assert!(!form.is_submitting());
    assert!(form.notification().is_none());
}

#[test]
fn step_one_gate_requires_every_personal_field() {
    // Every combination of filled/empty across the five personal fields.
    for mask in 0u32..(1 << SubmissionField::PERSONAL.len()) {
        let mut form = RegistrationForm::new();
        for (bit, field) in SubmissionField::PERSONAL.iter().enumerate() {
            let value = if mask & (1 << bit) != 0 { "x" } else { "" };
            form.set_field(*field, value).expect("set");
        }
        let all_filled = mask == (1 << SubmissionField::PERSONAL.len()) - 1;
        assert_eq!(form.can_proceed_step1(), all_filled, "mask {mask:05b}");
        match form.advance() {
            Ok(step) => {
                assert!(all_filled);
                assert_eq!(step, Step::Committee);
            }
            Err(FormError::StepIncomplete { step, missing }) => {
                assert!(!all_filled);
                assert_eq!(step, 1);
                assert_eq!(missing.len() as u32, 5 - mask.count_ones());
                assert_eq!(form.step(), Step::PersonalInfo);
            }
            Err(other) => panic!("unexpected error {other:?}"),
        }
    }
}

#[test]
fn step_two_gate_requires_experience_and_committee() {
    for (experience, committee) in [
        (None, None),
        (Some("none"), None),
        (None, Some("unfpa")),
        (Some("5+"), Some("unfpa")),
    ] {
        let mut form = RegistrationForm::new();
        fill_personal(&mut form);
        form.advance().expect("to committee");
        if let Some(code) = experience {
            form.select_experience(code).expect("experience");
        }
        if let Some(code) = committee {
            form.select_committee(code).expect("committee");
        }
        let both = experience.is_some() && committee.is_some();
        assert_eq!(form.can_proceed_step2(), both);
        assert_eq!(form.advance().is_ok(), both);
        assert_eq!(
            form.step(),
            if both { Step::Payment } else { Step::Committee }
        );
    }
}

#[test]
fn back_then_forward_preserves_values() {
    let mut form = form_on_payment_step();
    let before = form.values().clone();

    assert_eq!(form.back().expect("back"), Step::Committee);
    assert_eq!(form.back().expect("back"), Step::PersonalInfo);
    assert_eq!(form.back(), Err(FormError::NoPreviousStep));
    assert_eq!(form.values(), &before);

    form.advance().expect("forward");
    form.advance().expect("forward");
    assert_eq!(form.step(), Step::Payment);
    assert_eq!(form.values(), &before);
    assert_eq!(form.advance(), Err(FormError::NoNextStep));
}

#[test]
fn selections_are_limited_to_catalog_options() {
    let mut form = RegistrationForm::new();
    fill_personal(&mut form);
    form.advance().expect("to committee");
    assert_eq!(
        form.select_committee("unsc"),
        Err(FormError::UnknownOption {
            kind: "committee",
            code: "unsc".into()
        })
    );
    assert!(form.select_experience("lots").is_err());
    assert!(form.values().committee.is_empty());
    assert_eq!(RegistrationForm::committee_options().len(), 2);
    assert_eq!(RegistrationForm::experience_options().len(), 4);
}

#[test]
fn fields_are_only_editable_on_their_step() {
    let mut form = RegistrationForm::new();
    assert!(matches!(
        form.select_committee("unep"),
        Err(FormError::FieldNotOnStep { step: 1, .. })
    ));
    assert!(form.set_field(SubmissionField::Committee, "unep").is_err());

    let mut form = form_on_payment_step();
    assert!(matches!(
        form.set_field(SubmissionField::FullName, ""),
        Err(FormError::FieldNotOnStep { step: 3, .. })
    ));
    assert_eq!(form.values().full_name, "Aigerim K.");
}

#[test]
fn payment_proof_is_optional_and_kept_locally() {
    let mut form = RegistrationForm::new();
    assert_eq!(
        form.attach_payment_proof(PaymentProof::named("receipt.pdf")),
        Err(FormError::NotOnPaymentStep)
    );

    let mut form = form_on_payment_step();
    form.attach_payment_proof(PaymentProof::named("receipt.pdf"))
        .expect("attach");
    assert_eq!(
        form.payment_proof().map(|proof| proof.filename.as_str()),
        Some("receipt.pdf")
    );
    let payload = form.begin_submit().expect("payload");
    assert!(!serde_json::to_string(&payload).expect("json").contains("receipt"));
}

#[test]
fn duplicate_submit_is_refused_while_in_flight() {
    let mut form = form_on_payment_step();
    form.begin_submit().expect("first");
    assert!(form.is_submitting());
    assert_eq!(form.begin_submit(), Err(FormError::SubmitInFlight));
}

#[test]
fn form_is_frozen_while_submitting() {
    let mut form = form_on_payment_step();
    let sent = form.begin_submit().expect("payload");

    assert_eq!(form.back(), Err(FormError::SubmitInFlight));
    assert_eq!(form.advance(), Err(FormError::SubmitInFlight));
    assert_eq!(
        form.attach_payment_proof(PaymentProof::named("late.png")),
        Err(FormError::SubmitInFlight)
    );
    assert_eq!(form.clear_payment_proof(), Err(FormError::SubmitInFlight));
    assert_eq!(form.step(), Step::Payment);

    let failure = ClientError::UnexpectedResponse("connection reset".to_string());
    form.finish_submit(Err(failure)).expect("finish");
    assert_eq!(form.step(), Step::Payment);
    let retry = form.begin_submit().expect("retry payload");
    assert!(retry.is_complete());
    assert_eq!(retry, sent);
}

#[test]
fn fields_and_selections_locked_while_submitting() {
    let mut form = form_on_payment_step();
    form.begin_submit().expect("payload");
    assert_eq!(
        form.set_field(SubmissionField::FullName, ""),
        Err(FormError::SubmitInFlight)
    );
    assert_eq!(form.select_committee("unfpa"), Err(FormError::SubmitInFlight));
    assert_eq!(form.select_experience("none"), Err(FormError::SubmitInFlight));

    form.finish_submit(Err(ClientError::UnexpectedResponse("boom".to_string())))
        .expect("finish");
    assert_eq!(form.values().full_name, "Aigerim K.");
    assert_eq!(form.values().committee, "unep");
    assert_eq!(form.back(), Ok(Step::Committee));
}

#[test]
fn finish_without_begin_is_an_error() {
    let mut form = form_on_payment_step();
    assert_eq!(form.finish_submit(Ok(())), Err(FormError::NothingInFlight));
}

#[test]
fn submit_only_from_payment_step() {
    let mut form = RegistrationForm::new();
    assert_eq!(form.begin_submit(), Err(FormError::NotOnPaymentStep));
}

#[tokio::test]
async fn successful_submit_resets_form() {
    let transport = StubTransport::ok();
    let mut form = form_on_payment_step();
    form.attach_payment_proof(PaymentProof::named("kaspi.png"))
        .expect("attach");

    let notification = form.submit(&transport).await.expect("submit");
    assert!(notification.is_success());
    assert_eq!(notification.title(), SUCCESS_TITLE);
    assert_eq!(transport.calls.load(Ordering::SeqCst), 1);

    assert_eq!(form.step(), Step::PersonalInfo);
    assert_eq!(form.values(), &RegistrationSubmission::default());
    assert!(form.payment_proof().is_none());
    assert!(!form.is_submitting());
    assert_eq!(form.take_notification(), Some(Notification::Submitted));
    assert!(form.notification().is_none());
}

#[tokio::test]
async fn failed_submit_keeps_payment_step_and_values() {
    let transport = StubTransport::failing(500, "Missing required fields");
    let mut form = form_on_payment_step();
    let before = form.values().clone();

    let notification = form.submit(&transport).await.expect("submit");
    let Notification::Failed { message } = &notification else {
        panic!("expected failure notification");
    };
    assert!(message.contains("Missing required fields"));
    assert_eq!(form.step(), Step::Payment);
    assert_eq!(form.values(), &before);
    assert!(!form.is_submitting());

    // The user can retry straight away.
    let retry = StubTransport::ok();
    assert!(form.submit(&retry).await.expect("retry").is_success());
}

#[test]
fn step_titles_match_progress_indicator() {
    let titles: Vec<_> = Step::ALL.iter().map(|step| step.title()).collect();
    assert_eq!(titles, ["Personal Info", "Committee", "Payment"]);
}
