use std::{fs, str::FromStr};

use anyhow::{anyhow, Context};
use axum::http::StatusCode;
use serde::Deserialize;
use shared::error::ErrorCode;
use url::Url;

pub const SETTINGS_FILE: &str = "server.toml";

/// How intake failures map onto HTTP statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorStatusPolicy {
    /// Every failure is a 500, matching the hosted function this replaces.
    #[default]
    Uniform,
    /// Client mistakes are 400, email API failures 502, the rest 500.
    Classified,
}

impl ErrorStatusPolicy {
    pub fn status_for(self, code: ErrorCode) -> StatusCode {
        match (self, code) {
            (ErrorStatusPolicy::Uniform, _) => StatusCode::INTERNAL_SERVER_ERROR,
            (ErrorStatusPolicy::Classified, ErrorCode::Validation | ErrorCode::Parse) => {
                StatusCode::BAD_REQUEST
            }
            (ErrorStatusPolicy::Classified, ErrorCode::Upstream) => StatusCode::BAD_GATEWAY,
            (ErrorStatusPolicy::Classified, ErrorCode::Configuration) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl FromStr for ErrorStatusPolicy {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "uniform" => Ok(ErrorStatusPolicy::Uniform),
            "classified" => Ok(ErrorStatusPolicy::Classified),
            other => Err(anyhow!(
                "unknown error status policy '{other}' (expected 'uniform' or 'classified')"
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub server_bind: String,
    pub resend_api_key: Option<String>,
    pub email_api_base: String,
    pub email_from: String,
    pub organizer_email: String,
    pub error_status_policy: ErrorStatusPolicy,
    pub email_timeout_seconds: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8787".into(),
            resend_api_key: None,
            email_api_base: mailer::RESEND_API_BASE.into(),
            email_from: intake::DEFAULT_SENDER.into(),
            organizer_email: intake::DEFAULT_ORGANIZER.into(),
            error_status_policy: ErrorStatusPolicy::Uniform,
            email_timeout_seconds: None,
        }
    }
}

/// Non-secret settings that may live in `server.toml`. The email credential
/// is only ever taken from the environment.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    bind_addr: Option<String>,
    email_api_base: Option<String>,
    email_from: Option<String>,
    organizer_email: Option<String>,
    error_status_policy: Option<ErrorStatusPolicy>,
    email_timeout_seconds: Option<u64>,
}

pub fn load_settings() -> anyhow::Result<Settings> {
    let path = std::env::var("SERVER_CONFIG").unwrap_or_else(|_| SETTINGS_FILE.to_string());
    let raw = fs::read_to_string(&path).ok();
    load_settings_from(raw.as_deref(), |key| std::env::var(key).ok())
        .with_context(|| format!("invalid server settings (file '{path}')"))
}

/// Defaults, then `file_contents` (TOML), then environment lookups. For each
/// setting the `APP__` variable wins over the legacy name.
pub fn load_settings_from(
    file_contents: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if let Some(raw) = file_contents {
        let file_cfg: FileSettings = toml::from_str(raw).context("failed to parse settings file")?;
        if let Some(v) = file_cfg.bind_addr {
            settings.server_bind = v;
        }
        if let Some(v) = file_cfg.email_api_base {
            settings.email_api_base = v;
        }
        if let Some(v) = file_cfg.email_from {
            settings.email_from = v;
        }
        if let Some(v) = file_cfg.organizer_email {
            settings.organizer_email = v;
        }
        if let Some(v) = file_cfg.error_status_policy {
            settings.error_status_policy = v;
        }
        if let Some(v) = file_cfg.email_timeout_seconds {
            settings.email_timeout_seconds = Some(v);
        }
    }

    if let Some(v) = first_set(&env, &["SERVER_BIND", "APP__BIND_ADDR"]) {
        settings.server_bind = v;
    }
    if let Some(v) = first_set(&env, &["RESEND_API_KEY", "APP__RESEND_API_KEY"]) {
        settings.resend_api_key = Some(v);
    }
    if let Some(v) = first_set(&env, &["APP__EMAIL_API_BASE"]) {
        settings.email_api_base = v;
    }
    if let Some(v) = first_set(&env, &["APP__EMAIL_FROM"]) {
        settings.email_from = v;
    }
    if let Some(v) = first_set(&env, &["ORGANIZER_EMAIL", "APP__ORGANIZER_EMAIL"]) {
        settings.organizer_email = v;
    }
    if let Some(v) = first_set(&env, &["APP__ERROR_STATUS_POLICY"]) {
        settings.error_status_policy = v.parse()?;
    }
    if let Some(v) = first_set(&env, &["APP__EMAIL_TIMEOUT_SECONDS"]) {
        let seconds = v
            .trim()
            .parse::<u64>()
            .with_context(|| format!("APP__EMAIL_TIMEOUT_SECONDS must be a whole number, got '{v}'"))?;
        settings.email_timeout_seconds = Some(seconds);
    }

    // A blank credential counts as unset.
    settings.resend_api_key = settings
        .resend_api_key
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty());

    validate(&settings)?;
    Ok(settings)
}

/// The last name in `names` that is set wins.
fn first_set(env: &impl Fn(&str) -> Option<String>, names: &[&str]) -> Option<String> {
    names.iter().rev().find_map(|name| env(*name))
}

fn validate(settings: &Settings) -> anyhow::Result<()> {
    let base = Url::parse(&settings.email_api_base)
        .with_context(|| format!("invalid email API base '{}'", settings.email_api_base))?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(anyhow!(
            "email API base must be http or https, got '{}'",
            base.scheme()
        ));
    }
    if settings.organizer_email.trim().is_empty() {
        return Err(anyhow!("organizer email must not be empty"));
    }
    if settings.email_timeout_seconds == Some(0) {
        return Err(anyhow!("email timeout must be at least one second"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
