// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request validation.
//!
//! Raw request models are turned into validated inputs ([`NewSignup`],
//! [`Credentials`], [`OrderNotice`]) before any workflow runs. The
//! validated types can only be built through `TryFrom`, so a workflow
//! never sees unchecked input.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{LoginRequest, OrderConfirmationRequest, OrderItem, SignupRequest};

pub const MIN_NAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;
const MAX_EMAIL_LEN: usize = 254;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
        .unwrap_or_else(|e| panic!("email pattern must compile: {e}"))
});

/// One rejected field.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct FieldError {
    /// JSON name of the field.
    pub field: String,
    pub message: String,
}

/// All field errors of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.field.as_str()).collect()
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }

    fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields = self.fields().join(", ");
        write!(f, "invalid fields: {fields}")
    }
}

impl std::error::Error for ValidationErrors {}

/// Whether `email` is a plausible mailbox address.
pub fn is_valid_email(email: &str) -> bool {
    email.len() <= MAX_EMAIL_LEN && EMAIL_RE.is_match(email)
}

/// Canonical form of an email address: trimmed and lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// A JSON number, or a string holding one.
fn parse_amount(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn check_email(errors: &mut ValidationErrors, field: &str, raw: Option<String>) -> String {
    match present(raw) {
        Some(raw) => {
            let email = normalize_email(&raw);
            if !is_valid_email(&email) {
                errors.push(field, "must be a valid email address");
            }
            email
        }
        None => {
            errors.push(field, "is required");
            String::new()
        }
    }
}

// =============================================================================
// Signup
// =============================================================================

/// Validated signup input.
#[derive(Clone, PartialEq, Eq)]
pub struct NewSignup {
    name: String,
    email: String,
    password: String,
}

impl std::fmt::Debug for NewSignup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewSignup")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl NewSignup {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl TryFrom<SignupRequest> for NewSignup {
    type Error = ValidationErrors;

    fn try_from(request: SignupRequest) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();

        let name = request.name.unwrap_or_default().trim().to_string();
        if name.chars().count() < MIN_NAME_LEN {
            errors.push(
                "name",
                format!("must be at least {MIN_NAME_LEN} characters"),
            );
        }

        let email = check_email(&mut errors, "email", request.email);

        let password = request.password.unwrap_or_default();
        if password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(
                "password",
                format!("must be at least {MIN_PASSWORD_LEN} characters"),
            );
        }

        errors.finish(|| NewSignup {
            name,
            email,
            password,
        })
    }
}

// =============================================================================
// Login
// =============================================================================

/// Validated login input. The email is normalised; the password is not
/// checked for length so that old accounts are never locked out by a rule
/// change.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl TryFrom<LoginRequest> for Credentials {
    type Error = ValidationErrors;

    fn try_from(request: LoginRequest) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();

        let email = match present(request.email) {
            Some(email) => normalize_email(&email),
            None => {
                errors.push("email", "is required");
                String::new()
            }
        };

        let password = request.password.unwrap_or_default();
        if password.is_empty() {
            errors.push("password", "is required");
        }

        errors.finish(|| Credentials { email, password })
    }
}

// =============================================================================
// Order Confirmation
// =============================================================================

/// Validated order-confirmation input.
///
/// `user_name` is trimmed but not escaped; templates escape every
/// interpolated value.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderNotice {
    pub order_id: String,
    pub user_name: String,
    pub user_email: String,
    pub items: Vec<OrderItem>,
    pub total: f64,
    pub seller_email: Option<String>,
}

impl TryFrom<OrderConfirmationRequest> for OrderNotice {
    type Error = ValidationErrors;

    fn try_from(request: OrderConfirmationRequest) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();

        let user_email = check_email(&mut errors, "userEmail", request.user_email);

        let user_name = request.user_name.unwrap_or_default().trim().to_string();
        if user_name.is_empty() {
            errors.push("userName", "is required");
        }

        let order_id = match request.order_id {
            Some(serde_json::Value::String(id)) => id.trim().to_string(),
            Some(serde_json::Value::Number(id)) => id.to_string(),
            _ => String::new(),
        };
        if order_id.is_empty() {
            errors.push("orderId", "is required");
        }

        let items = request.order_items.unwrap_or_default();
        if items.is_empty() {
            errors.push("orderItems", "must contain at least one item");
        }

        let total = match request.order_total.as_ref().map(parse_amount) {
            Some(Some(total)) if total.is_finite() && total >= 0.0 => total,
            Some(_) => {
                errors.push("orderTotal", "must be a non-negative number");
                0.0
            }
            None => {
                errors.push("orderTotal", "is required");
                0.0
            }
        };

        let seller_email = match present(request.seller_email) {
            Some(raw) => {
                let email = normalize_email(&raw);
                if !is_valid_email(&email) {
                    errors.push("sellerEmail", "must be a valid email address");
                }
                Some(email)
            }
            None => None,
        };

        errors.finish(|| OrderNotice {
            order_id,
            user_name,
            user_email,
            items,
            total,
            seller_email,
        })
    }
}
