// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Credential hashing and signed bearer tokens for the account flows.
//!
//! ## Tokens
//!
//! Both token kinds are HS256 JWTs signed with the process-wide
//! `JWT_SECRET`; neither is persisted.
//!
//! - **Verification token**: `{name, email, iat, exp}`, one hour, embedded
//!   in the emailed verification link
//! - **Session token**: `{id, iat, exp}`, 24 hours, returned by login
//!
//! Expiry is checked against the local clock with no leeway.
//!
//! ## Passwords
//!
//! Passwords are hashed with Argon2id and a fresh random salt per hash.
//! Plaintext never leaves the hasher.

pub mod claims;
pub mod error;
pub mod password;
pub mod tokens;

pub use claims::{SessionClaims, VerificationClaims};
pub use error::{AuthError, CredentialFailure};
pub use password::{CredentialHasher, HashCost, HashError};
pub use tokens::{SignedClaims, SigningError, TokenError, TokenService};
