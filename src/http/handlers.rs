//! Request handlers.
//!
//! One generic pipeline serves every submission kind; the per-route
//! functions only pin the kind. Per-request state machine:
//!
//! ```text
//! received → config guard → validate → {400 + violations}
//!                               ↓
//!                  sanitize → format → deliver → {200 | 500}
//! ```

use std::time::Instant;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::http::response::{ApiError, ApiSuccess};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::submission::{format_message, local_now, sanitize, SubmissionKind, ValidatedSubmission};

pub async fn submit_application(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Response {
    handle_submission(SubmissionKind::Application, &state, body).await
}

pub async fn request_callback(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    handle_submission(SubmissionKind::Callback, &state, body).await
}

pub async fn request_ngn_callback(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Response {
    handle_submission(SubmissionKind::NgnCallback, &state, body).await
}

pub async fn request_wimax(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    handle_submission(SubmissionKind::Wimax, &state, body).await
}

pub async fn submit_connection_request(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Response {
    handle_submission(SubmissionKind::ConnectionRequest, &state, body).await
}

/// Health probe, exempt from rate limiting.
pub async fn health() -> Response {
    Json(json!({
        "status": "OK",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
    .into_response()
}

/// Fallback for unmatched routes.
pub async fn not_found() -> Response {
    ApiError::NotFound.into_response()
}

async fn handle_submission(kind: SubmissionKind, state: &AppState, body: Value) -> Response {
    let start = Instant::now();

    // Config-first ordering: a request that cannot possibly be
    // delivered is refused before its content is inspected.
    let Some(notifier) = state.notifier.as_deref() else {
        tracing::error!(kind = kind.as_str(), "Messaging credentials not configured");
        return finish(kind, start, ApiError::Configuration.into_response());
    };

    let input = body.as_object().cloned().unwrap_or_default();
    let validated = match ValidatedSubmission::parse(kind, &input, &state.config.validation) {
        Ok(validated) => validated,
        Err(violations) => {
            tracing::debug!(
                kind = kind.as_str(),
                violations = violations.len(),
                "Validation failed"
            );
            return finish(kind, start, ApiError::Validation(violations).into_response());
        }
    };

    let sanitized = sanitize(validated);
    let message = format_message(&sanitized, notifier.chat_id(), local_now());

    match notifier.deliver(&message).await {
        Ok(ack) => {
            tracing::info!(
                kind = kind.as_str(),
                message_id = ?ack.message_id,
                "Lead delivered"
            );
            metrics::record_delivery("ok");
            finish(
                kind,
                start,
                ApiSuccess::new(kind.success_message()).into_response(),
            )
        }
        Err(error) => {
            // Raw detail stays in the logs; the client gets a generic error.
            tracing::error!(kind = kind.as_str(), error = %error, "Delivery failed");
            metrics::record_delivery("error");
            finish(kind, start, ApiError::Delivery.into_response())
        }
    }
}

fn finish(kind: SubmissionKind, start: Instant, response: Response) -> Response {
    metrics::record_submission(kind.as_str(), response.status().as_u16(), start);
    response
}
