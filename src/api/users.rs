// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    error::ApiError,
    models::{LoginRequest, LoginResponse, MessageResponse, SignupRequest},
    state::AppState,
    validation::{Credentials, NewSignup},
};

pub const VERIFICATION_SENT: &str = "Verification email sent";
pub const EMAIL_VERIFIED: &str = "Email verified successfully. You can now log in.";
pub const LOGIN_SUCCEEDED: &str = "Login successful";

#[utoipa::path(
    post,
    path = "/api/user/signup",
    request_body = SignupRequest,
    tag = "Users",
    responses(
        (status = 201, body = MessageResponse),
        (status = 400, description = "Validation failed or user already exists"),
        (status = 429, description = "Too many signup attempts"),
        (status = 500, description = "Server error during signup")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Json(request) = payload?;
    let signup = NewSignup::try_from(request)?;

    state
        .auth
        .signup(signup)
        .await
        .map_err(|e| ApiError::from_workflow(e, "Server error during signup"))?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(VERIFICATION_SENT)),
    ))
}

/// Redeem the emailed link. Responds in plain text since it is opened
/// in a browser.
#[utoipa::path(
    get,
    path = "/api/user/verify/{token}",
    params(("token" = String, Path, description = "Verification token from the email link")),
    tag = "Users",
    responses(
        (status = 200, description = "Email verified", body = String, content_type = "text/plain"),
        (status = 400, description = "Invalid, expired or already used link", body = String, content_type = "text/plain")
    )
)]
pub async fn verify_email(State(state): State<AppState>, Path(token): Path<String>) -> Response {
    match state.auth.verify(&token).await {
        Ok(_) => (StatusCode::OK, EMAIL_VERIFIED).into_response(),
        Err(e) => ApiError::from_workflow(e, "Verification failed").into_plain_text(),
    }
}

#[utoipa::path(
    post,
    path = "/api/user/login",
    request_body = LoginRequest,
    tag = "Users",
    responses(
        (status = 200, body = LoginResponse),
        (status = 400, description = "Invalid credentials"),
        (status = 500, description = "Login failed")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = payload?;
    let credentials = Credentials::try_from(request)?;

    let outcome = state
        .auth
        .login(credentials)
        .await
        .map_err(|e| ApiError::from_workflow(e, "Login failed"))?;

    Ok(Json(LoginResponse {
        message: LOGIN_SUCCEEDED.to_string(),
        token: outcome.token,
        user: outcome.user,
    }))
}
