use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::{
        header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_ORIGIN},
        HeaderValue, Method, StatusCode,
    },
    routing::{get, post},
    Json, Router,
};
use shared::{
    error::ErrorBody,
    protocol::{intake_route, SubmissionAccepted, CORS_ALLOW_HEADERS, CORS_ALLOW_ORIGIN},
};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;

use app_state::AppState;
use config::load_settings;

const MAX_SUBMISSION_BYTES: usize = 64 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings()?;
    if settings.resend_api_key.is_none() {
        warn!("RESEND_API_KEY is not set; registrations will be rejected until it is configured");
    }
    let state = AppState::from_settings(&settings)?;
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(
        %addr,
        organizer = %settings.organizer_email,
        policy = ?settings.error_status_policy,
        "registration intake listening"
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/", post(http_submit_registration).options(preflight))
        .route(
            intake_route(),
            post(http_submit_registration).options(preflight),
        )
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_SUBMISSION_BYTES))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(CORS_ALLOW_ORIGIN),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(CORS_ALLOW_HEADERS),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

/// Cross-origin preflight. Answered before any body handling.
async fn preflight() -> StatusCode {
    StatusCode::OK
}

type ErrorResponse = (StatusCode, Json<ErrorBody>);

fn error_response(status: StatusCode, message: impl Into<String>) -> ErrorResponse {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

async fn not_found(method: Method) -> Result<StatusCode, ErrorResponse> {
    if method == Method::OPTIONS {
        return Ok(preflight().await);
    }
    Err(error_response(StatusCode::NOT_FOUND, "not found"))
}

/// Known path, unrouted method. OPTIONS still gets the preflight answer.
async fn method_not_allowed(method: Method) -> Result<StatusCode, ErrorResponse> {
    if method == Method::OPTIONS {
        return Ok(preflight().await);
    }
    Err(error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        format!("{method} is not allowed here"),
    ))
}

/// The body is taken as raw bytes so malformed JSON is reported through the
/// intake error path instead of the extractor's own rejection.
async fn http_submit_registration(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<SubmissionAccepted>, ErrorResponse> {
    let body = body.map_err(|rejection| {
        warn!(status = %rejection.status(), "registration body rejected");
        error_response(rejection.status(), rejection.body_text())
    })?;
    let accepted = intake::submit_registration(&state.intake, &body)
        .await
        .map_err(|e| {
            let api_error = e.to_api_error();
            (
                state.error_status_policy.status_for(api_error.code),
                Json(ErrorBody::from(api_error)),
            )
        })?;
    Ok(Json(accepted))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
