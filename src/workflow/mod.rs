// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Workflows
//!
//! Orchestration of the hasher, token service, account store and mailer.
//! Handlers parse requests into validated inputs and hand them here; the
//! workflows never see raw JSON.
//!
//! - [`AuthWorkflow`]: signup, email verification and login
//! - [`OrderNotificationWorkflow`]: buyer and seller order mail

pub mod auth;
pub mod error;
pub mod orders;

pub use auth::{AuthSettings, AuthWorkflow, LoginOutcome};
pub use error::WorkflowError;
pub use orders::OrderNotificationWorkflow;
