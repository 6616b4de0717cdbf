// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared test fixtures.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use secrecy::SecretString;

use crate::{
    auth::{CredentialHasher, HashCost, TokenService},
    config::{AppConfig, JWT_SECRET_ENV, PASSWORD_HASH_ITERATIONS_ENV, PASSWORD_HASH_MEMORY_ENV},
    mailer::{MailError, Mailer, OutgoingEmail},
    policy::AllowAll,
    state::AppState,
    storage::InMemoryAccountStore,
    workflow::auth::VERIFY_PATH,
};

pub const TEST_SECRET: &str = "test-secret-at-least-32-bytes-long!!";

/// Hasher with the cheapest Argon2id parameters.
pub fn fast_hasher() -> CredentialHasher {
    CredentialHasher::new(HashCost {
        memory_kib: 8,
        iterations: 1,
    })
    .unwrap()
}

pub fn test_tokens() -> TokenService {
    TokenService::new(&SecretString::from(TEST_SECRET))
}

pub fn test_config() -> AppConfig {
    AppConfig::from_lookup(|key| match key {
        JWT_SECRET_ENV => Some(TEST_SECRET.to_string()),
        PASSWORD_HASH_MEMORY_ENV => Some("8".to_string()),
        PASSWORD_HASH_ITERATIONS_ENV => Some("1".to_string()),
        _ => None,
    })
    .unwrap()
}

/// Mailer that records what it is asked to send.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    fail_all: Mutex<bool>,
    fail_for: Mutex<Vec<String>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send fails.
    pub fn fail_all(&self) {
        *self.fail_all.lock().unwrap() = true;
    }

    /// Sends to `recipient` fail.
    pub fn fail_for(&self, recipient: &str) {
        self.fail_for.lock().unwrap().push(recipient.to_string());
    }

    /// Successfully sent emails, in order.
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let refused = *self.fail_all.lock().unwrap()
            || self.fail_for.lock().unwrap().iter().any(|r| r == &email.to);
        if refused {
            return Err(MailError::Transport(format!("refused {}", email.to)));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

/// Pull the verification token out of a verification email.
pub fn verify_token_in(email: &OutgoingEmail) -> String {
    let start = email.text.find(VERIFY_PATH).unwrap() + VERIFY_PATH.len();
    email.text[start..]
        .split_whitespace()
        .next()
        .unwrap()
        .to_string()
}

pub struct TestApp {
    pub state: AppState,
    pub store: Arc<InMemoryAccountStore>,
    pub mailer: Arc<RecordingMailer>,
}

/// State over an in-memory store and a recording mailer, with gates open.
pub fn test_app() -> TestApp {
    let store = Arc::new(InMemoryAccountStore::new());
    let mailer = Arc::new(RecordingMailer::new());
    let state = AppState::new(&test_config(), store.clone(), mailer.clone())
        .unwrap()
        .with_gates(Arc::new(AllowAll), Arc::new(AllowAll));
    TestApp {
        state,
        store,
        mailer,
    }
}
