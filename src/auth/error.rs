// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::http::StatusCode;

use super::tokens::TokenError;

/// Why a login attempt was refused.
///
/// Both reasons are the same error kind; they only differ in wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialFailure {
    /// No account with that email, or the account is not verified yet.
    UnknownOrUnverified,
    /// The account exists and is verified but the password does not match.
    PasswordMismatch,
}

/// Authentication error type.
///
/// Covers the failures of the verify and login transitions. All of them
/// are client errors (400).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// Login refused
    InvalidCredentials(CredentialFailure),
    /// Verification link redeemed for an account that is already verified
    AlreadyVerified,
    /// Verification link names an account that does not exist
    NotFound,
    /// Verification link is past its expiry
    Expired,
    /// Verification link has a bad signature or payload
    InvalidToken,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials(_) => "invalid_credentials",
            AuthError::AlreadyVerified => "already_verified",
            AuthError::NotFound => "not_found",
            AuthError::Expired => "token_expired",
            AuthError::InvalidToken => "invalid_token",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

impl From<TokenError> for AuthError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Expired => AuthError::Expired,
            TokenError::Invalid => AuthError::InvalidToken,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::InvalidCredentials(CredentialFailure::UnknownOrUnverified) => {
                write!(f, "Invalid email or email not verified")
            }
            AuthError::InvalidCredentials(CredentialFailure::PasswordMismatch) => {
                write!(f, "Invalid password")
            }
            AuthError::AlreadyVerified => write!(f, "Email already verified"),
            AuthError::NotFound => write!(f, "Invalid token"),
            AuthError::Expired => {
                write!(f, "Verification link has expired. Please sign up again.")
            }
            AuthError::InvalidToken => write!(f, "Invalid or expired token."),
        }
    }
}

impl std::error::Error for AuthError {}
