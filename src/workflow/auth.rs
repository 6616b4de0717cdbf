// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signup, email verification and login.
//!
//! ## Account States
//!
//! ```text
//! NonExistent --signup--> Unverified --verify--> Verified
//! ```
//!
//! Only `Verified` accounts can log in. Verification is never undone.
//!
//! ## Known gaps
//!
//! - Signup checks for an existing account before hashing, so two
//!   concurrent signups for one email can both pass the check. The store's
//!   `insert` rejects the second write and the caller sees a conflict.
//! - The account is stored before the verification email is sent. If the
//!   send fails the account stays unverified and signup reports a server
//!   error; signing up again then fails with a conflict until the account
//!   is removed by an operator.

use std::{sync::Arc, time::Duration};

use url::Url;

use super::WorkflowError;
use crate::{
    auth::{
        AuthError, CredentialFailure, CredentialHasher, SessionClaims, SignedClaims,
        TokenService, VerificationClaims,
    },
    config::AppConfig,
    mailer::{templates, Mailer},
    models::{Account, PublicUser},
    storage::AccountStore,
    validation::{Credentials, NewSignup},
};

/// Path under `BASE_URL` that redeems a verification token.
pub const VERIFY_PATH: &str = "/api/user/verify/";

/// Link and token lifetimes.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// Origin the verification link points at.
    pub base_url: Url,
    pub verification_ttl: Duration,
    pub session_ttl: Duration,
}

impl AuthSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            verification_ttl: config.verification_ttl,
            session_ttl: config.session_ttl,
        }
    }

    /// `<base>/api/user/verify/<token>`
    pub fn verify_url(&self, token: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}{VERIFY_PATH}{token}")
    }
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Session bearer token.
    pub token: String,
    pub user: PublicUser,
}

/// Drives accounts through `NonExistent → Unverified → Verified`.
pub struct AuthWorkflow {
    store: Arc<dyn AccountStore>,
    mailer: Arc<dyn Mailer>,
    hasher: CredentialHasher,
    tokens: TokenService,
    settings: AuthSettings,
}

impl std::fmt::Debug for AuthWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthWorkflow")
            .field("hasher", &self.hasher)
            .field("tokens", &self.tokens)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl AuthWorkflow {
    pub fn new(
        store: Arc<dyn AccountStore>,
        mailer: Arc<dyn Mailer>,
        hasher: CredentialHasher,
        tokens: TokenService,
        settings: AuthSettings,
    ) -> Self {
        Self {
            store,
            mailer,
            hasher,
            tokens,
            settings,
        }
    }

    /// Create an unverified account and mail its verification link.
    ///
    /// Returns the stored account. Fails with `Conflict` if the email is
    /// taken and with `Delivery` if the link could not be sent; in the
    /// latter case the account has already been stored.
    pub async fn signup(&self, signup: NewSignup) -> Result<Account, WorkflowError> {
        if self.store.find_by_email(signup.email()).await?.is_some() {
            tracing::info!(email = %signup.email(), "Signup rejected: account exists");
            return Err(WorkflowError::Conflict);
        }

        let password_hash = self.hasher.hash_async(signup.password().to_string()).await?;
        let account = Account::new_unverified(
            signup.name().to_string(),
            signup.email().to_string(),
            password_hash,
        );
        self.store.insert(&account).await?;

        let token = self.tokens.issue(
            VerificationClaims {
                name: account.name.clone(),
                email: account.email.clone(),
            },
            self.settings.verification_ttl,
        )?;
        let verify_url = self.settings.verify_url(&token);
        let email = templates::verification_email(&account.email, &account.name, &verify_url);

        if let Err(e) = self.mailer.send(&email).await {
            tracing::error!(
                account_id = %account.id,
                error = %e,
                "Verification email failed; account left unverified"
            );
            return Err(e.into());
        }

        tracing::info!(account_id = %account.id, "Account created; verification email sent");
        Ok(account)
    }

    /// Redeem a verification token and mark its account verified.
    pub async fn verify(&self, token: &str) -> Result<Account, WorkflowError> {
        let SignedClaims { claims, .. } = self
            .tokens
            .redeem::<VerificationClaims>(token)
            .map_err(AuthError::from)?;

        let mut account = self
            .store
            .find_by_email(&claims.email)
            .await?
            .ok_or(AuthError::NotFound)?;

        account.mark_verified()?;
        self.store.update(&account).await?;

        tracing::info!(account_id = %account.id, "Email verified");
        Ok(account)
    }

    /// Check credentials of a verified account and issue a session token.
    pub async fn login(&self, credentials: Credentials) -> Result<LoginOutcome, WorkflowError> {
        let account = match self.store.find_by_email(credentials.email()).await? {
            Some(account) if account.is_verified => account,
            _ => {
                return Err(
                    AuthError::InvalidCredentials(CredentialFailure::UnknownOrUnverified).into(),
                );
            }
        };

        let matches = self
            .hasher
            .verify_async(
                credentials.password().to_string(),
                account.password_hash.clone(),
            )
            .await?;
        if !matches {
            tracing::info!(account_id = %account.id, "Login rejected: password mismatch");
            return Err(AuthError::InvalidCredentials(CredentialFailure::PasswordMismatch).into());
        }

        let token = self.tokens.issue(
            SessionClaims {
                id: account.id.clone(),
            },
            self.settings.session_ttl,
        )?;

        tracing::info!(account_id = %account.id, "Login succeeded");
        Ok(LoginOutcome {
            token,
            user: PublicUser::from(&account),
        })
    }
}
