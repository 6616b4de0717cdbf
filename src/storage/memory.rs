// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory account store.
//!
//! Everything is lost on restart. Used when `DATA_DIR` is not configured
//! and throughout the tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{AccountStore, StorageError, StorageResult};
use crate::models::Account;

#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<HashMap<String, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn find_by_email(&self, email: &str) -> StorageResult<Option<Account>> {
        Ok(self.accounts.read().await.get(email).cloned())
    }

    async fn insert(&self, account: &Account) -> StorageResult<()> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.email) {
            return Err(StorageError::AlreadyExists(format!(
                "Account {}",
                account.email
            )));
        }
        accounts.insert(account.email.clone(), account.clone());
        Ok(())
    }

    async fn update(&self, account: &Account) -> StorageResult<()> {
        let mut accounts = self.accounts.write().await;
        match accounts.get_mut(&account.email) {
            Some(stored) => {
                *stored = account.clone();
                Ok(())
            }
            None => Err(StorageError::NotFound(format!("Account {}", account.email))),
        }
    }
}
