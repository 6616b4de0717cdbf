// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Outbound Mail
//!
//! The [`Mailer`] trait is the only way the workflows send mail.
//!
//! ## Transports
//!
//! - [`SmtpMailer`]: STARTTLS SMTP relay via lettre (`EMAIL_USER` set)
//! - [`LogMailer`]: logs recipient and subject, sends nothing
//!
//! Neither transport applies its own deadline beyond lettre's SMTP
//! timeout; a stalled relay stalls the request that is waiting on it.

use async_trait::async_trait;

pub mod smtp;
pub mod templates;

pub use smtp::SmtpMailer;

/// A rendered email ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    /// Plain-text alternative.
    pub text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("invalid address: {0}")]
    Address(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("failed to send email: {0}")]
    Transport(String),
}

/// Sends a rendered email.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;
}

/// Mailer that only logs. Used when no SMTP account is configured.
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            html_length = email.html.len(),
            "LogMailer: email logged (not sent)"
        );
        Ok(())
    }
}
