use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

#[cfg(feature = "testing")]
pub mod testing;

pub const RESEND_API_BASE: &str = "https://api.resend.com";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DispatchReceipt {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Email sending failed: {body}")]
    Rejected { status: u16, body: String },
    #[error("email API request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<DispatchReceipt, MailerError>;
}

#[derive(Debug, Clone)]
pub struct ResendConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl ResendConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: RESEND_API_BASE.to_string(),
            timeout: None,
        }
    }

    fn emails_url(&self) -> String {
        format!("{}/emails", self.base_url.trim_end_matches('/'))
    }
}

/// Transactional email over the Resend HTTP API.
#[derive(Debug, Clone)]
pub struct ResendClient {
    http: Client,
    config: ResendConfig,
}

impl ResendClient {
    pub fn new(config: ResendConfig) -> Result<Self, MailerError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            config,
        })
    }
}

#[async_trait]
impl EmailSender for ResendClient {
    async fn send(&self, email: &OutboundEmail) -> Result<DispatchReceipt, MailerError> {
        let response = self
            .http
            .post(self.config.emails_url())
            .bearer_auth(&self.config.api_key)
            .json(email)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            error!(status = status.as_u16(), %body, "email API rejected message");
            return Err(MailerError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let receipt = parse_receipt(status, &body);
        info!(id = ?receipt.id, "registration email accepted by email API");
        Ok(receipt)
    }
}

fn parse_receipt(status: StatusCode, body: &str) -> DispatchReceipt {
    if status == StatusCode::NO_CONTENT || body.trim().is_empty() {
        return DispatchReceipt::default();
    }
    serde_json::from_str(body).unwrap_or_default()
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
