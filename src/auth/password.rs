// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Argon2id password hashing.
//!
//! Hashes are PHC strings (`$argon2id$v=19$m=...,t=...,p=1$salt$hash`), so
//! each one records the cost it was produced with. Raising the configured
//! cost only affects new hashes; existing ones still verify.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
        }
    }
}

impl HashCost {
    /// Check the parameters against Argon2's limits.
    pub fn validate(&self) -> Result<(), String> {
        self.params().map(|_| ()).map_err(|e| e.to_string())
    }

    fn params(&self) -> Result<Params, argon2::Error> {
        Params::new(self.memory_kib, self.iterations, 1, None)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HashError {
    #[error("invalid hash parameters: {0}")]
    Params(String),

    #[error("failed to hash password: {0}")]
    Hash(String),

    #[error("stored password hash is malformed")]
    MalformedHash,

    #[error("password verification failed: {0}")]
    Verify(String),

    #[error("hashing task failed: {0}")]
    Worker(String),
}

/// One-way password hasher.
#[derive(Clone)]
pub struct CredentialHasher {
    params: Params,
}

impl std::fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialHasher")
            .field("memory_kib", &self.params.m_cost())
            .field("iterations", &self.params.t_cost())
            .finish()
    }
}

impl CredentialHasher {
    pub fn new(cost: HashCost) -> Result<Self, HashError> {
        let params = cost.params().map_err(|e| HashError::Params(e.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password with a fresh random salt.
    pub fn hash(&self, plaintext: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| HashError::Hash(e.to_string()))
    }

    /// Check a password against a stored hash.
    ///
    /// A mismatch is `Ok(false)`; only a corrupt hash or an internal
    /// failure is an error.
    pub fn verify(&self, plaintext: &str, hashed: &str) -> Result<bool, HashError> {
        let parsed = PasswordHash::new(hashed).map_err(|_| HashError::MalformedHash)?;
        match self.argon2().verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(HashError::Verify(e.to_string())),
        }
    }

    /// [`hash`](Self::hash) on the blocking thread pool.
    pub async fn hash_async(&self, plaintext: String) -> Result<String, HashError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| HashError::Worker(e.to_string()))?
    }

    /// [`verify`](Self::verify) on the blocking thread pool.
    pub async fn verify_async(&self, plaintext: String, hashed: String) -> Result<bool, HashError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &hashed))
            .await
            .map_err(|e| HashError::Worker(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fast_hasher;

    #[test]
    fn hash_then_verify_round_trips() {
        let hasher = fast_hasher();
        let hash = hasher.hash("secret1").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("secret1"));
        assert!(hasher.verify("secret1", &hash).unwrap());
    }

    #[test]
    fn verify_rejects_other_password() {
        let hasher = fast_hasher();
        let hash = hasher.hash("secret1").unwrap();
        assert!(!hasher.verify("secret2", &hash).unwrap());
        assert!(!hasher.verify("", &hash).unwrap());
    }

    #[test]
    fn salts_differ_per_call() {
        let hasher = fast_hasher();
        let a = hasher.hash("same-password").unwrap();
        let b = hasher.hash("same-password").unwrap();
        assert_ne!(a, b);
        assert!(hasher.verify("same-password", &a).unwrap());
        assert!(hasher.verify("same-password", &b).unwrap());
    }

    #[test]
    fn hashes_from_another_cost_still_verify() {
        let strong = CredentialHasher::new(HashCost {
            memory_kib: 64,
            iterations: 2,
        })
        .unwrap();
        let hash = strong.hash("secret1").unwrap();
        assert!(fast_hasher().verify("secret1", &hash).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        let result = fast_hasher().verify("secret1", "not-a-phc-string");
        assert!(matches!(result, Err(HashError::MalformedHash)));
    }

    #[test]
    fn zero_iterations_are_rejected() {
        let result = CredentialHasher::new(HashCost {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: 0,
        });
        assert!(matches!(result, Err(HashError::Params(_))));
    }

    #[test]
    fn debug_output_shows_cost_only() {
        let debug = format!("{:?}", fast_hasher());
        assert!(debug.contains("memory_kib"));
        assert!(debug.contains("iterations"));
    }

    #[tokio::test]
    async fn async_variants_match_sync() {
        let hasher = fast_hasher();
        let hash = hasher.hash_async("secret1".to_string()).await.unwrap();
        assert!(hasher
            .verify_async("secret1".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!hasher
            .verify_async("secret9".to_string(), hash)
            .await
            .unwrap());
    }
}
