// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded account database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `accounts`: normalised email → serialized Account (JSON bytes)

use std::path::Path;

use async_trait::async_trait;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use super::{AccountStore, StorageError, StorageResult};
use crate::models::Account;

/// File name of the database inside `DATA_DIR`.
pub const ACCOUNTS_DB_FILE: &str = "accounts.redb";

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: email → serialized Account.
const ACCOUNTS: TableDefinition<&str, &[u8]> = TableDefinition::new("accounts");

// =============================================================================
// AccountDatabase
// =============================================================================

/// Embedded ACID account database.
pub struct AccountDatabase {
    db: Database,
}

impl std::fmt::Debug for AccountDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountDatabase").finish_non_exhaustive()
    }
}

impl AccountDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create the table so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ACCOUNTS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Open `accounts.redb` inside a data directory.
    pub fn open_in_dir(dir: &Path) -> StorageResult<Self> {
        Self::open(&dir.join(ACCOUNTS_DB_FILE))
    }

    fn get(&self, email: &str) -> StorageResult<Option<Account>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ACCOUNTS)?;
        match table.get(email)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Write `account`, requiring it to be absent (`must_exist == false`) or
    /// present (`must_exist == true`). Check and write share one transaction.
    fn put(&self, account: &Account, must_exist: bool) -> StorageResult<()> {
        let json = serde_json::to_vec(account)?;
        let email = account.email.as_str();

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(ACCOUNTS)?;
            let exists = table.get(email)?.is_some();

            match (exists, must_exist) {
                (true, false) => {
                    return Err(StorageError::AlreadyExists(format!("Account {email}")));
                }
                (false, true) => {
                    return Err(StorageError::NotFound(format!("Account {email}")));
                }
                _ => {}
            }

            table.insert(email, json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

#[async_trait]
impl AccountStore for AccountDatabase {
    async fn find_by_email(&self, email: &str) -> StorageResult<Option<Account>> {
        self.get(email)
    }

    async fn insert(&self, account: &Account) -> StorageResult<()> {
        self.put(account, false)
    }

    async fn update(&self, account: &Account) -> StorageResult<()> {
        self.put(account, true)
    }

    async fn health_check(&self) -> StorageResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(ACCOUNTS)?;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
