use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::RegistrationSubmission,
    error::ErrorBody,
    protocol::SubmissionAccepted,
};
use tracing::{info, warn};

use crate::{error::ClientError, SubmissionTransport};

/// Posts registrations to the intake endpoint.
#[derive(Debug, Clone)]
pub struct IntakeClient {
    http: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl IntakeClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
            api_key: None,
        }
    }

    /// Sends `key` as both bearer token and `apikey` header, as the hosted
    /// function gateway expects.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SubmissionTransport for IntakeClient {
    async fn submit(&self, submission: &RegistrationSubmission) -> Result<(), ClientError> {
        let mut request = self.http.post(&self.endpoint).json(submission);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key).header("apikey", key);
        }
        let response = request.send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|err| err.error)
                .unwrap_or(body);
            warn!(status = status.as_u16(), %message, "registration rejected by intake");
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let accepted: SubmissionAccepted = serde_json::from_str(&body)
            .map_err(|e| ClientError::UnexpectedResponse(format!("{e}: {body}")))?;
        if !accepted.success {
            return Err(ClientError::UnexpectedResponse(body));
        }
        info!(endpoint = %self.endpoint, "registration accepted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/client_tests.rs"]
mod tests;
