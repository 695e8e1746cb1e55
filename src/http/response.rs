//! JSON response vocabulary.
//!
//! Every terminal state of a submission request maps to exactly one
//! of these shapes: `{success, message}` on the happy path, or
//! `{success, error, details?}` on failure. Raw upstream errors never
//! appear here; they stay in the logs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Successful submission response body.
#[derive(Debug, Serialize)]
pub struct ApiSuccess {
    pub success: bool,
    pub message: String,
}

impl ApiSuccess {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiSuccess {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Client-visible failure outcomes.
#[derive(Debug)]
pub enum ApiError {
    /// One or more constraint violations; client-fixable.
    Validation(Vec<String>),
    /// Messaging credentials missing; operator-fixable.
    Configuration,
    /// External messaging service unreachable or rejected the message.
    Delivery,
    /// Unmatched route.
    NotFound,
}

#[derive(Debug, Serialize)]
struct FailureBody {
    success: bool,
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<String>>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Configuration | ApiError::Delivery => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Validation(details) => (
                status,
                Json(FailureBody {
                    success: false,
                    error: "Проверьте правильность заполнения формы",
                    details: Some(details),
                }),
            )
                .into_response(),
            ApiError::Configuration => (
                status,
                Json(FailureBody {
                    success: false,
                    error: "Сервис уведомлений не настроен. Попробуйте позже.",
                    details: None,
                }),
            )
                .into_response(),
            ApiError::Delivery => (
                status,
                Json(FailureBody {
                    success: false,
                    error: "Не удалось отправить заявку. Попробуйте позже.",
                    details: None,
                }),
            )
                .into_response(),
            ApiError::NotFound => (
                status,
                Json(serde_json::json!({ "error": "Endpoint not found" })),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_error_taxonomy() {
        assert_eq!(ApiError::Validation(vec![]).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Configuration.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::Delivery.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_body_carries_details() {
        let body = serde_json::to_value(FailureBody {
            success: false,
            error: "Проверьте правильность заполнения формы",
            details: Some(vec!["Выберите тариф".into()]),
        })
        .unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["details"][0], "Выберите тариф");
    }

    #[test]
    fn generic_failures_omit_details() {
        let body = serde_json::to_value(FailureBody {
            success: false,
            error: "x",
            details: None,
        })
        .unwrap();
        assert!(body.get("details").is_none());
    }
}
