//! In-memory [`EmailSender`] doubles.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{DispatchReceipt, EmailSender, MailerError, OutboundEmail};

#[derive(Debug, Clone)]
enum Outcome {
    Accept,
    Reject { status: u16, body: String },
}

/// Records every message it is asked to send and answers with a fixed outcome.
#[derive(Debug, Clone)]
pub struct RecordingSender {
    outcome: Outcome,
    sent: Arc<Mutex<Vec<OutboundEmail>>>,
}

impl RecordingSender {
    pub fn accepting() -> Self {
        Self {
            outcome: Outcome::Accept,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn rejecting(status: u16, body: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Reject {
                status,
                body: body.into(),
            },
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl EmailSender for RecordingSender {
    async fn send(&self, email: &OutboundEmail) -> Result<DispatchReceipt, MailerError> {
        self.sent.lock().await.push(email.clone());
        match &self.outcome {
            Outcome::Accept => Ok(DispatchReceipt {
                id: Some(format!("test-{}", self.sent.lock().await.len())),
            }),
            Outcome::Reject { status, body } => Err(MailerError::Rejected {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}
