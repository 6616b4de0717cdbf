// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::rejection::JsonRejection,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::{
    validation::{FieldError, ValidationErrors},
    workflow::WorkflowError,
};

pub const VALIDATION_FAILED: &str = "Validation failed";

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub error_code: Option<&'static str>,
    pub errors: Vec<FieldError>,
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_code: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldError>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            error_code: None,
            errors: Vec::new(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn validation(errors: ValidationErrors) -> Self {
        Self {
            errors: errors.into_vec(),
            ..Self::bad_request(VALIDATION_FAILED)
        }
    }

    /// Map a workflow failure. `context` replaces the message of server
    /// errors so internals never reach the client.
    pub fn from_workflow(err: WorkflowError, context: &'static str) -> Self {
        match err {
            WorkflowError::Validation(errors) => Self::validation(errors),
            WorkflowError::Conflict => Self::bad_request(err.to_string()),
            WorkflowError::Auth(auth) => Self {
                error_code: Some(auth.error_code()),
                ..Self::new(auth.status_code(), auth.to_string())
            },
            WorkflowError::Delivery(_) | WorkflowError::Internal(_) => {
                tracing::error!(error = %err, "{context}");
                Self::internal(context)
            }
        }
    }

    /// Render as a `text/plain` body carrying only the message.
    pub fn into_plain_text(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.message,
        )
            .into_response()
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        Self::from_workflow(err, "Internal server error")
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::validation(errors)
    }
}

/// Malformed or non-JSON bodies are validation failures, never 422.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(ValidationErrors::single("body", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            message: self.message,
            error_code: self.error_code,
            errors: self.errors,
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthError, CredentialFailure};
    use crate::mailer::MailError;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body_bytes).unwrap()
    }

    #[test]
    fn constructors_set_status_and_message() {
        let bad = ApiError::bad_request("bad");
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);
        assert_eq!(bad.message, "bad");

        let internal = ApiError::internal("oops");
        assert_eq!(internal.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(internal.message, "oops");
    }

    #[tokio::test]
    async fn into_response_returns_json_body() {
        let response = ApiError::bad_request("bad data").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"message":"bad data"}"#);
    }

    #[tokio::test]
    async fn validation_lists_field_errors() {
        let mut errors = ValidationErrors::new();
        errors.push("name", "must be at least 3 characters");
        errors.push("password", "must be at least 6 characters");

        let response = ApiError::validation(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Validation failed");
        assert_eq!(body["errors"][0]["field"], "name");
        assert_eq!(body["errors"][1]["field"], "password");
    }

    #[tokio::test]
    async fn auth_errors_carry_code() {
        let err = WorkflowError::Auth(AuthError::InvalidCredentials(
            CredentialFailure::UnknownOrUnverified,
        ));
        let response = ApiError::from_workflow(err, "Login failed").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Invalid email or email not verified");
        assert_eq!(body["error_code"], "invalid_credentials");
    }

    #[test]
    fn conflict_is_bad_request() {
        let api = ApiError::from_workflow(WorkflowError::Conflict, "Server error during signup");
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.message, "User already exists");
    }

    #[test]
    fn server_errors_use_context_message() {
        let delivery = WorkflowError::Delivery(MailError::Transport("relay refused".into()));
        let api = ApiError::from_workflow(delivery, "Failed to send email");
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.message, "Failed to send email");

        let internal = WorkflowError::Internal("redb: disk full".into());
        let api = ApiError::from_workflow(internal, "Server error during signup");
        assert_eq!(api.message, "Server error during signup");
    }

    #[tokio::test]
    async fn plain_text_has_message_only() {
        let response = ApiError::bad_request("Email already verified").into_plain_text();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body_bytes[..], b"Email already verified");
    }
}
