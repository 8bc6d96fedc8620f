use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use form_core::{IntakeClient, RegistrationForm};
use shared::domain::{PaymentProof, SubmissionField};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Walks the three registration steps and submits the result.
#[derive(Parser, Debug)]
struct Args {
    /// Full URL of the intake endpoint.
    #[arg(long)]
    intake_url: String,
    /// Key sent to the function gateway, if it requires one.
    #[arg(long)]
    api_key: Option<String>,
    #[arg(long)]
    full_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    school: String,
    #[arg(long)]
    city: String,
    /// One of: none, 1-2, 3-5, 5+
    #[arg(long)]
    experience: String,
    #[arg(long)]
    committee: String,
    /// Screenshot or PDF of the payment. Recorded locally, not uploaded.
    #[arg(long)]
    payment_proof: Option<PathBuf>,
    /// Print the payload instead of sending it.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let args = Args::parse();

    let mut form = RegistrationForm::new();
    for (field, value) in [
        (SubmissionField::FullName, &args.full_name),
        (SubmissionField::Email, &args.email),
        (SubmissionField::Phone, &args.phone),
        (SubmissionField::School, &args.school),
        (SubmissionField::City, &args.city),
    ] {
        form.set_field(field, value.as_str())?;
    }
    form.advance().context("personal information is incomplete")?;

    form.select_experience(&args.experience)?;
    form.select_committee(&args.committee)?;
    form.advance().context("committee selection is incomplete")?;

    if let Some(path) = &args.payment_proof {
        let metadata = std::fs::metadata(path)
            .with_context(|| format!("cannot read payment proof '{}'", path.display()))?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        form.attach_payment_proof(PaymentProof {
            filename,
            size_bytes: Some(metadata.len()),
            mime_type: None,
        })?;
    }

    if args.dry_run {
        let payload = form.begin_submit()?;
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let mut client = IntakeClient::new(args.intake_url);
    if let Some(key) = args.api_key {
        client = client.with_api_key(key);
    }
    info!(endpoint = client.endpoint(), "submitting registration");
    let notification = form.submit(&client).await?;
    println!("{}", notification.title());
    println!("{}", notification.description());
    if !notification.is_success() {
        bail!("registration was not accepted");
    }
    Ok(())
}
