use std::{sync::Arc, time::Duration};

use anyhow::Context;
use intake::{Envelope, IntakeContext};
use mailer::{ResendClient, ResendConfig};

use crate::config::{ErrorStatusPolicy, Settings};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) intake: IntakeContext,
    pub(crate) error_status_policy: ErrorStatusPolicy,
}

impl AppState {
    pub(crate) fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let envelope = Envelope {
            from: settings.email_from.clone(),
            organizer: settings.organizer_email.clone(),
        };
        let intake = match &settings.resend_api_key {
            Some(api_key) => {
                let client = ResendClient::new(ResendConfig {
                    api_key: api_key.clone(),
                    base_url: settings.email_api_base.clone(),
                    timeout: settings.email_timeout_seconds.map(Duration::from_secs),
                })
                .context("failed to build email API client")?;
                IntakeContext::new(Arc::new(client), envelope)
            }
            None => IntakeContext::unconfigured(envelope),
        };
        Ok(Self {
            intake,
            error_status_policy: settings.error_status_policy,
        })
    }
}
