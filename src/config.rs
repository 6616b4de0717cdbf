// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! [`AppConfig`] loaded once at startup. A `.env` file in the working
//! directory is honoured by `main` before the environment is read.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `5000` |
//! | `JWT_SECRET` | Token signing secret | Required |
//! | `BASE_URL` | Origin used in verification links | `http://localhost:5000` |
//! | `PASSWORD_HASH_MEMORY_KIB` | Argon2id memory cost | `19456` |
//! | `PASSWORD_HASH_ITERATIONS` | Argon2id time cost | `2` |
//! | `VERIFICATION_TOKEN_TTL_SECS` | Verification link lifetime | `3600` |
//! | `SESSION_TOKEN_TTL_SECS` | Session token lifetime | `86400` |
//! | `SELLER_EMAIL` | Default seller recipient for order mail | `seller@example.com` |
//! | `SMTP_HOST` | SMTP relay host | `smtp.gmail.com` |
//! | `SMTP_PORT` | SMTP relay port | `587` |
//! | `EMAIL_USER` | SMTP user and From address | Optional (log-only mail when unset) |
//! | `EMAIL_PASS` | SMTP password | Optional |
//! | `EMAIL_SENDER_NAME` | From display name | `Your Store` |
//! | `DATA_DIR` | Directory for the account database | Optional (in-memory when unset) |
//! | `RATE_LIMIT_MAX_REQUESTS` | Requests allowed per address per window | `5` |
//! | `RATE_LIMIT_WINDOW_SECS` | Rate limit window | `900` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::{auth::HashCost, telemetry::LogFormat};

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const BASE_URL_ENV: &str = "BASE_URL";
pub const PASSWORD_HASH_MEMORY_ENV: &str = "PASSWORD_HASH_MEMORY_KIB";
pub const PASSWORD_HASH_ITERATIONS_ENV: &str = "PASSWORD_HASH_ITERATIONS";
pub const VERIFICATION_TTL_ENV: &str = "VERIFICATION_TOKEN_TTL_SECS";
pub const SESSION_TTL_ENV: &str = "SESSION_TOKEN_TTL_SECS";
pub const SELLER_EMAIL_ENV: &str = "SELLER_EMAIL";
pub const SMTP_HOST_ENV: &str = "SMTP_HOST";
pub const SMTP_PORT_ENV: &str = "SMTP_PORT";
pub const EMAIL_USER_ENV: &str = "EMAIL_USER";
pub const EMAIL_PASS_ENV: &str = "EMAIL_PASS";
pub const EMAIL_SENDER_NAME_ENV: &str = "EMAIL_SENDER_NAME";

/// Environment variable name for the account database directory.
///
/// When unset, accounts live in memory and are lost on restart.
pub const DATA_DIR_ENV: &str = "DATA_DIR";
pub const RATE_LIMIT_MAX_ENV: &str = "RATE_LIMIT_MAX_REQUESTS";
pub const RATE_LIMIT_WINDOW_ENV: &str = "RATE_LIMIT_WINDOW_SECS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_BASE_URL: &str = "http://localhost:5000";
const DEFAULT_SELLER_EMAIL: &str = "seller@example.com";
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_SENDER_NAME: &str = "Your Store";

/// Verification links are valid for one hour.
pub const DEFAULT_VERIFICATION_TTL: Duration = Duration::from_secs(60 * 60);
/// Session tokens are valid for one day.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);
/// 5 requests per address...
pub const DEFAULT_RATE_LIMIT_MAX: u32 = 5;
/// ...per 15 minutes.
pub const DEFAULT_RATE_LIMIT_WINDOW: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// SMTP relay settings. Present only when `EMAIL_USER` is configured.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
    pub sender_name: String,
}

/// Per-address request gate settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSettings {
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_RATE_LIMIT_MAX,
            window: DEFAULT_RATE_LIMIT_WINDOW,
        }
    }
}

/// Process-wide configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: SecretString,
    pub base_url: Url,
    pub hash_cost: HashCost,
    pub verification_ttl: Duration,
    pub session_ttl: Duration,
    pub seller_email: String,
    pub smtp: Option<SmtpSettings>,
    pub data_dir: Option<PathBuf>,
    pub rate_limit: RateLimitSettings,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let jwt_secret = get(JWT_SECRET_ENV)
            .map(SecretString::from)
            .ok_or(ConfigError::Missing(JWT_SECRET_ENV))?;

        let base_url_raw = get(BASE_URL_ENV).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&base_url_raw).map_err(|e| ConfigError::Invalid {
            var: BASE_URL_ENV,
            reason: e.to_string(),
        })?;

        let defaults = HashCost::default();
        let hash_cost = HashCost {
            memory_kib: parse_or(&get, PASSWORD_HASH_MEMORY_ENV, defaults.memory_kib)?,
            iterations: parse_or(&get, PASSWORD_HASH_ITERATIONS_ENV, defaults.iterations)?,
        };
        hash_cost.validate().map_err(|reason| ConfigError::Invalid {
            var: PASSWORD_HASH_MEMORY_ENV,
            reason,
        })?;

        let verification_ttl = Duration::from_secs(parse_or(
            &get,
            VERIFICATION_TTL_ENV,
            DEFAULT_VERIFICATION_TTL.as_secs(),
        )?);
        let session_ttl =
            Duration::from_secs(parse_or(&get, SESSION_TTL_ENV, DEFAULT_SESSION_TTL.as_secs())?);

        let smtp = match get(EMAIL_USER_ENV) {
            Some(username) => Some(SmtpSettings {
                host: get(SMTP_HOST_ENV).unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
                port: parse_or(&get, SMTP_PORT_ENV, DEFAULT_SMTP_PORT)?,
                username,
                password: SecretString::from(get(EMAIL_PASS_ENV).unwrap_or_default()),
                sender_name: get(EMAIL_SENDER_NAME_ENV)
                    .unwrap_or_else(|| DEFAULT_SENDER_NAME.to_string()),
            }),
            None => None,
        };

        let rate_limit = RateLimitSettings {
            max_requests: parse_or(&get, RATE_LIMIT_MAX_ENV, DEFAULT_RATE_LIMIT_MAX)?,
            window: Duration::from_secs(parse_or(
                &get,
                RATE_LIMIT_WINDOW_ENV,
                DEFAULT_RATE_LIMIT_WINDOW.as_secs(),
            )?),
        };

        Ok(Self {
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(&get, PORT_ENV, DEFAULT_PORT)?,
            jwt_secret,
            base_url,
            hash_cost,
            verification_ttl,
            session_ttl,
            seller_email: get(SELLER_EMAIL_ENV)
                .map(|email| email.trim().to_lowercase())
                .unwrap_or_else(|| DEFAULT_SELLER_EMAIL.to_string()),
            smtp,
            data_dir: get(DATA_DIR_ENV).map(PathBuf::from),
            rate_limit,
            log_format: get(LOG_FORMAT_ENV)
                .map(|value| LogFormat::parse(&value))
                .unwrap_or_default(),
        })
    }

    /// `host:port` string for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether the signing secret looks like a throwaway value.
    pub fn has_weak_secret(&self) -> bool {
        self.jwt_secret.expose_secret().len() < 32
    }
}

fn parse_or<T, G>(get: &G, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(var) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
