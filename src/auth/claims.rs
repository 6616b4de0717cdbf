// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Claim sets carried by the two token kinds.

use serde::{Deserialize, Serialize};

/// Claims of the emailed verification link.
///
/// The email is the lookup key on redemption; the name is carried so the
/// link is self-describing. Nothing about the password is ever included.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerificationClaims {
    pub name: String,
    pub email: String,
}

/// Claims of the bearer token returned by login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Account ID.
    pub id: String,
}
