// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Data Models
//!
//! The stored [`Account`] record plus the request and response structures
//! used by the REST API. API types derive `ToSchema` for the OpenAPI
//! document.
//!
//! Request fields are optional at the serde level so that a missing field
//! is reported as a field error by validation instead of being rejected by
//! the JSON extractor.
//!
//! ## Model Categories
//!
//! - **Account**: The persisted user record
//! - **Auth**: Signup and login payloads
//! - **Orders**: Order-confirmation payloads

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthError;

// =============================================================================
// Account
// =============================================================================

/// Verification state of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountState {
    /// Created by signup; cannot log in yet.
    Unverified,
    /// Email confirmed; terminal.
    Verified,
}

/// A user account as stored.
///
/// `email` is the unique key. `password_hash` is an Argon2id PHC string
/// and is never serialized into an API response.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_verified: bool,
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("is_verified", &self.is_verified)
            .finish()
    }
}

impl Account {
    /// A fresh, unverified account with a random ID.
    pub fn new_unverified(name: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            password_hash,
            is_verified: false,
        }
    }

    pub fn state(&self) -> AccountState {
        if self.is_verified {
            AccountState::Verified
        } else {
            AccountState::Unverified
        }
    }

    /// Move `Unverified → Verified`.
    ///
    /// Verification never reverts; calling this on a verified account is
    /// an error and leaves it untouched.
    pub fn mark_verified(&mut self) -> Result<(), AuthError> {
        match self.state() {
            AccountState::Unverified => {
                self.is_verified = true;
                Ok(())
            }
            AccountState::Verified => Err(AuthError::AlreadyVerified),
        }
    }
}

// =============================================================================
// Auth Models
// =============================================================================

/// Request to create an account.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct SignupRequest {
    /// Display name (at least 3 characters).
    pub name: Option<String>,
    /// Email address; becomes the login name.
    pub email: Option<String>,
    /// Password (at least 6 characters).
    pub password: Option<String>,
}

/// Request to log in.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// A bare acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Non-sensitive account fields.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&Account> for PublicUser {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.clone(),
            name: account.name.clone(),
            email: account.email.clone(),
        }
    }
}

/// Successful login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    /// Session bearer token, valid for 24 hours.
    pub token: String,
    pub user: PublicUser,
}

// =============================================================================
// Order Models
// =============================================================================

/// One line of an order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
    /// Unit price.
    pub price: f64,
}

/// Request to mail an order confirmation to the buyer and the seller.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderConfirmationRequest {
    pub user_email: Option<String>,
    pub user_name: Option<String>,
    /// String or number.
    #[schema(value_type = Option<String>)]
    pub order_id: Option<serde_json::Value>,
    pub order_items: Option<Vec<OrderItem>>,
    /// Number or numeric string.
    #[schema(value_type = Option<f64>)]
    pub order_total: Option<serde_json::Value>,
    /// Overrides the configured seller recipient.
    pub seller_email: Option<String>,
}

/// Order mail was handed to the transport.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct OrderConfirmationResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account::new_unverified(
            "Ann".to_string(),
            "ann@x.com".to_string(),
            "$argon2id$v=19$m=8,t=1,p=1$c2FsdA$aGFzaA".to_string(),
        )
    }

    #[test]
    fn new_accounts_start_unverified_with_unique_ids() {
        let a = account();
        let b = account();
        assert_eq!(a.state(), AccountState::Unverified);
        assert!(!a.is_verified);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn mark_verified_happens_once() {
        let mut a = account();
        a.mark_verified().unwrap();
        assert_eq!(a.state(), AccountState::Verified);

        assert_eq!(a.mark_verified(), Err(AuthError::AlreadyVerified));
        assert!(a.is_verified);
    }

    #[test]
    fn debug_redacts_password_hash() {
        let debug = format!("{:?}", account());
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("argon2id"));
    }

    #[test]
    fn public_user_omits_hash() {
        let a = account();
        let json = serde_json::to_value(PublicUser::from(&a)).unwrap();
        assert_eq!(json["email"], "ann@x.com");
        assert!(json.get("password_hash").is_none());
        assert!(json.get("is_verified").is_none());
    }

    #[test]
    fn order_request_reads_camel_case() {
        let request: OrderConfirmationRequest = serde_json::from_value(serde_json::json!({
            "userEmail": "bob@x.com",
            "userName": "Bob",
            "orderId": 42,
            "orderItems": [{ "name": "Mug", "quantity": 2, "price": 4.5 }],
            "orderTotal": 9.0
        }))
        .unwrap();

        assert_eq!(request.user_email.as_deref(), Some("bob@x.com"));
        assert_eq!(request.order_id, Some(serde_json::json!(42)));
        assert_eq!(request.order_items.unwrap().len(), 1);
        assert!(request.seller_email.is_none());
    }

    #[test]
    fn missing_signup_fields_deserialize_as_none() {
        let request: SignupRequest = serde_json::from_str("{}").unwrap();
        assert!(request.name.is_none());
        assert!(request.email.is_none());
        assert!(request.password.is_none());
    }
}
