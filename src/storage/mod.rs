// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Account Storage
//!
//! Accounts are the only durable state. They are keyed by normalised
//! email, which the store keeps unique.
//!
//! ## Backends
//!
//! - [`InMemoryAccountStore`]: process memory, for development and tests
//! - [`AccountDatabase`]: embedded redb file under `DATA_DIR`
//!
//! ## Uniqueness
//!
//! Signup checks for an existing account before hashing and inserting.
//! Two concurrent signups for the same email can both pass that check;
//! `insert` is the backstop and fails the second one with
//! [`StorageError::AlreadyExists`].

use async_trait::async_trait;

use crate::models::Account;

pub mod accounts_db;
pub mod memory;

pub use accounts_db::AccountDatabase;
pub use memory::InMemoryAccountStore;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Durable record of accounts keyed by email.
///
/// Implementations must be safe for concurrent use.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Look up an account by normalised email.
    async fn find_by_email(&self, email: &str) -> StorageResult<Option<Account>>;

    /// Store a new account. Fails with `AlreadyExists` if the email is taken.
    async fn insert(&self, account: &Account) -> StorageResult<()>;

    /// Replace an existing account. Fails with `NotFound` if it is absent.
    async fn update(&self, account: &Account) -> StorageResult<()>;

    /// Check the backend is usable.
    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }
}
