// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account Mail Server - signup, email verification, login and order mail.
//!
//! Accounts move `NonExistent → Unverified → Verified`. Signup stores an
//! unverified account and mails a signed, one-hour verification link;
//! redeeming the link verifies the account; only verified accounts can
//! log in and receive a 24-hour session token. Order-confirmation mail is
//! independent of account state.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Password hashing and signed tokens
//! - `config` - Environment configuration
//! - `mailer` - Outbound mail transports and templates
//! - `policy` - Per-address request gates
//! - `storage` - Account store (in-memory or redb)
//! - `workflow` - Signup/verify/login and order notification flows

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod mailer;
pub mod models;
pub mod policy;
pub mod state;
pub mod storage;
pub mod telemetry;
pub mod validation;
pub mod workflow;

#[cfg(test)]
mod testing;
