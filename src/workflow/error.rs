// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use crate::{
    auth::{AuthError, HashError, SigningError},
    mailer::MailError,
    storage::StorageError,
    validation::ValidationErrors,
};

/// Failure of a workflow operation.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// Input rejected before any side effect.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// An account with this email already exists.
    #[error("User already exists")]
    Conflict,

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The mail transport refused or failed.
    #[error("mail delivery failed: {0}")]
    Delivery(#[from] MailError),

    /// Hashing, signing or store failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StorageError> for WorkflowError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::AlreadyExists(_) => WorkflowError::Conflict,
            other => WorkflowError::Internal(other.to_string()),
        }
    }
}

impl From<HashError> for WorkflowError {
    fn from(e: HashError) -> Self {
        WorkflowError::Internal(e.to_string())
    }
}

impl From<SigningError> for WorkflowError {
    fn from(e: SigningError) -> Self {
        WorkflowError::Internal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_insert_is_a_conflict() {
        let err = WorkflowError::from(StorageError::AlreadyExists("Account ann@x.com".into()));
        assert!(matches!(err, WorkflowError::Conflict));
    }

    #[test]
    fn other_storage_errors_are_internal() {
        let err = WorkflowError::from(StorageError::NotFound("Account ann@x.com".into()));
        assert!(matches!(err, WorkflowError::Internal(_)));
    }

    #[test]
    fn auth_errors_pass_through() {
        let err = WorkflowError::from(AuthError::Expired);
        assert!(matches!(err, WorkflowError::Auth(AuthError::Expired)));
        assert_eq!(
            err.to_string(),
            "Verification link has expired. Please sign up again."
        );
    }
}
