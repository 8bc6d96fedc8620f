use serde::{Deserialize, Serialize};

pub use crate::domain::RegistrationSubmission;

/// Headers browsers may send with a cross-origin submission, including the
/// platform-identification headers added by the hosted client library.
pub const CORS_ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type, \
x-supabase-client-platform, x-supabase-client-platform-version, \
x-supabase-client-runtime, x-supabase-client-runtime-version";

pub const CORS_ALLOW_ORIGIN: &str = "*";

pub fn intake_route() -> &'static str {
    "/send-registration"
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionAccepted {
    pub success: bool,
}

impl SubmissionAccepted {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
