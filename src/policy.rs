// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request gates applied before a request reaches a workflow.
//!
//! The HTTP layer asks a [`RequestGate`] whether a caller (keyed by
//! address) may proceed. Workflows know nothing about gating.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;

use crate::config::RateLimitSettings;

/// Number of distinct callers tracked per gate before the least recently
/// seen is evicted.
pub const DEFAULT_TRACKED_KEYS: usize = 10_000;

/// Outcome of a gate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allowed,
    /// Rejected until the current window closes.
    Limited { retry_after: Duration },
}

/// Decides whether a caller may proceed.
pub trait RequestGate: Send + Sync {
    fn permit(&self, key: &str) -> GateDecision;
}

/// Gate that lets everything through.
#[derive(Clone, Debug, Default)]
pub struct AllowAll;

impl RequestGate for AllowAll {
    fn permit(&self, _key: &str) -> GateDecision {
        GateDecision::Allowed
    }
}

struct Window {
    started_at: Instant,
    count: u32,
}

/// Per-key fixed-window counter: at most `max_requests` per `window`.
pub struct FixedWindowLimiter {
    windows: Mutex<LruCache<String, Window>>,
    max_requests: u32,
    window: Duration,
}

impl std::fmt::Debug for FixedWindowLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedWindowLimiter")
            .field("max_requests", &self.max_requests)
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

impl FixedWindowLimiter {
    pub fn new(settings: RateLimitSettings) -> Self {
        Self::with_capacity(settings, DEFAULT_TRACKED_KEYS)
    }

    pub fn with_capacity(settings: RateLimitSettings, capacity: usize) -> Self {
        Self {
            windows: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
            )),
            max_requests: settings.max_requests,
            window: settings.window,
        }
    }

    /// Check `key` as of `now`.
    pub fn permit_at(&self, key: &str, now: Instant) -> GateDecision {
        // A poisoned lock fails open.
        let Ok(mut windows) = self.windows.lock() else {
            return GateDecision::Allowed;
        };

        let expired = windows
            .peek(key)
            .is_none_or(|w| now.saturating_duration_since(w.started_at) >= self.window);
        if expired {
            windows.put(
                key.to_string(),
                Window {
                    started_at: now,
                    count: 0,
                },
            );
        }

        let Some(window) = windows.get_mut(key) else {
            return GateDecision::Allowed;
        };
        if window.count >= self.max_requests {
            let elapsed = now.saturating_duration_since(window.started_at);
            return GateDecision::Limited {
                retry_after: self.window.saturating_sub(elapsed),
            };
        }

        window.count += 1;
        GateDecision::Allowed
    }
}

impl RequestGate for FixedWindowLimiter {
    fn permit(&self, key: &str) -> GateDecision {
        self.permit_at(key, Instant::now())
    }
}
