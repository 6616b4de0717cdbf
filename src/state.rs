// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::{
    auth::{CredentialHasher, HashError, TokenService},
    config::AppConfig,
    mailer::Mailer,
    policy::{FixedWindowLimiter, RequestGate},
    storage::AccountStore,
    workflow::{AuthSettings, AuthWorkflow, OrderNotificationWorkflow},
};

/// Shared handles, built once at startup and cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthWorkflow>,
    pub orders: Arc<OrderNotificationWorkflow>,
    /// Kept for readiness checks.
    pub store: Arc<dyn AccountStore>,
    pub signup_gate: Arc<dyn RequestGate>,
    pub email_gate: Arc<dyn RequestGate>,
}

impl AppState {
    /// Wire the workflows from configuration. Signup and order mail each
    /// get their own per-address gate.
    pub fn new(
        config: &AppConfig,
        store: Arc<dyn AccountStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Result<Self, HashError> {
        let hasher = CredentialHasher::new(config.hash_cost)?;
        let tokens = TokenService::new(&config.jwt_secret);

        let auth = AuthWorkflow::new(
            store.clone(),
            mailer.clone(),
            hasher,
            tokens,
            AuthSettings::from_config(config),
        );
        let orders = OrderNotificationWorkflow::new(mailer, config.seller_email.clone());

        Ok(Self {
            auth: Arc::new(auth),
            orders: Arc::new(orders),
            store,
            signup_gate: Arc::new(FixedWindowLimiter::new(config.rate_limit)),
            email_gate: Arc::new(FixedWindowLimiter::new(config.rate_limit)),
        })
    }

    /// Replace both request gates.
    pub fn with_gates(
        mut self,
        signup_gate: Arc<dyn RequestGate>,
        email_gate: Arc<dyn RequestGate>,
    ) -> Self {
        self.signup_gate = signup_gate;
        self.email_gate = email_gate;
        self
    }
}
