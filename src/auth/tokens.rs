// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signed, time-limited bearer tokens.
//!
//! Tokens are HS256 JWTs. The claim set is flattened next to `iat` and
//! `exp` so a verification token reads `{name, email, iat, exp}` and a
//! session token `{id, iat, exp}`.

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// A claim set together with its issue and expiry times (Unix seconds).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignedClaims<C> {
    #[serde(flatten)]
    pub claims: C,
    pub iat: i64,
    pub exp: i64,
}

/// Why a token could not be redeemed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("token is invalid")]
    Invalid,
}

#[derive(Debug, thiserror::Error)]
#[error("failed to sign token: {0}")]
pub struct SigningError(#[from] jsonwebtoken::errors::Error);

/// Issues and redeems tokens with the process-wide signing secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &Algorithm::HS256)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &SecretString) -> Self {
        let key = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        // Windows are strict: expired means expired.
        validation.leeway = 0;
        validation.validate_exp = true;

        Self {
            encoding: EncodingKey::from_secret(key),
            decoding: DecodingKey::from_secret(key),
            validation,
        }
    }

    /// Sign `claims` valid for `ttl` from now.
    pub fn issue<C: Serialize>(&self, claims: C, ttl: Duration) -> Result<String, SigningError> {
        self.issue_at(claims, ttl, Utc::now())
    }

    /// Sign `claims` as if issued at `issued_at`.
    pub fn issue_at<C: Serialize>(
        &self,
        claims: C,
        ttl: Duration,
        issued_at: DateTime<Utc>,
    ) -> Result<String, SigningError> {
        let iat = issued_at.timestamp();
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let signed = SignedClaims {
            claims,
            iat,
            exp: iat.saturating_add(ttl_secs),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &signed, &self.encoding)?)
    }

    /// Verify signature and expiry and return the claims.
    ///
    /// The signature is checked first, so a tampered token is `Invalid`
    /// even when it is also past its expiry.
    pub fn redeem<C: DeserializeOwned>(&self, token: &str) -> Result<SignedClaims<C>, TokenError> {
        decode::<SignedClaims<C>>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}
