// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Per-client cooldown ledger for contact submissions.
//!
//! Each client identifier maps to the millisecond timestamp of the last
//! submission that passed the cooldown check. A client is admitted again
//! once a full cooldown window has elapsed since that timestamp.

use crate::config::RateLimitConfig;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// Result of a cooldown check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Submission admitted; the slot has been charged
    Allowed,
    /// Client is still inside its cooldown window
    Limited {
        /// Time until the window expires
        retry_after: Duration,
    },
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed)
    }
}

/// Thread-safe cooldown ledger.
#[derive(Clone)]
pub struct RateLimiter {
    /// Configuration
    config: RateLimitConfig,
    /// Client identifier -> last charged timestamp (ms since epoch)
    ledger: Arc<RwLock<HashMap<String, i64>>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            ledger: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn window_ms(&self) -> i64 {
        i64::try_from(self.config.cooldown_ms).unwrap_or(i64::MAX)
    }

    /// Check the cooldown for `client_id` and, if admitted, record `now_ms`
    /// as its last charged timestamp.
    ///
    /// Lookup and write happen under one write lock, so concurrent calls for
    /// the same client admit at most one submission per window.
    pub async fn check_and_charge(&self, client_id: &str, now_ms: i64) -> RateLimitResult {
        let window = self.window_ms();
        let mut ledger = self.ledger.write().await;

        if let Some(&last) = ledger.get(client_id) {
            if now_ms.saturating_sub(last) < window {
                let remaining_ms = last.saturating_add(window).saturating_sub(now_ms);
                let retry_after = Duration::from_millis(u64::try_from(remaining_ms).unwrap_or(0));
                debug!(client_id, ?retry_after, "Client in cooldown");
                return RateLimitResult::Limited { retry_after };
            }
        }

        ledger.insert(client_id.to_string(), now_ms);
        RateLimitResult::Allowed
    }

    /// Last charged timestamp for a client, if any.
    pub async fn last_charged(&self, client_id: &str) -> Option<i64> {
        self.ledger.read().await.get(client_id).copied()
    }

    /// Evict entries whose window has fully elapsed. Returns the number removed.
    ///
    /// Only entries that can no longer cause a rejection are removed.
    pub async fn cleanup(&self, now_ms: i64) -> usize {
        let window = self.window_ms();
        let mut ledger = self.ledger.write().await;
        let before = ledger.len();
        ledger.retain(|_, last| now_ms.saturating_sub(*last) < window);
        let removed = before - ledger.len();
        if removed > 0 {
            debug!(removed, remaining = ledger.len(), "Swept expired cooldown entries");
        }
        removed
    }

    /// Number of tracked clients.
    pub async fn len(&self) -> usize {
        self.ledger.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.ledger.read().await.is_empty()
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: i64 = 1_700_000_000_000;

    fn limiter() -> RateLimiter {
        RateLimiter::new(RateLimitConfig::default())
    }

    #[tokio::test]
    async fn test_first_submission_allowed() {
        let limiter = limiter();
        assert!(limiter.check_and_charge("203.0.113.7", T0).await.is_allowed());
        assert_eq!(limiter.last_charged("203.0.113.7").await, Some(T0));
    }

    #[tokio::test]
    async fn test_window_boundary() {
        let limiter = limiter();
        assert!(limiter.check_and_charge("a", T0).await.is_allowed());

        match limiter.check_and_charge("a", T0 + 59_999).await {
            RateLimitResult::Limited { retry_after } => {
                assert_eq!(retry_after, Duration::from_millis(1));
            }
            RateLimitResult::Allowed => panic!("Should be limited"),
        }

        assert!(limiter.check_and_charge("a", T0 + 60_000).await.is_allowed());
    }

    #[tokio::test]
    async fn test_rejection_does_not_extend_window() {
        let limiter = limiter();
        assert!(limiter.check_and_charge("a", T0).await.is_allowed());
        assert!(!limiter.check_and_charge("a", T0 + 30_000).await.is_allowed());
        assert_eq!(limiter.last_charged("a").await, Some(T0));
        assert!(limiter.check_and_charge("a", T0 + 60_000).await.is_allowed());
    }

    #[tokio::test]
    async fn test_clients_independent() {
        let limiter = limiter();
        assert!(limiter.check_and_charge("a", T0).await.is_allowed());
        assert!(limiter.check_and_charge("b", T0 + 1).await.is_allowed());
        assert!(!limiter.check_and_charge("a", T0 + 2).await.is_allowed());
    }

    #[tokio::test]
    async fn test_clock_going_backwards_stays_limited() {
        let limiter = limiter();
        assert!(limiter.check_and_charge("a", T0).await.is_allowed());
        match limiter.check_and_charge("a", T0 - 5_000).await {
            RateLimitResult::Limited { retry_after } => {
                assert_eq!(retry_after, Duration::from_millis(65_000));
            }
            RateLimitResult::Allowed => panic!("Should be limited"),
        }
    }

    #[tokio::test]
    async fn test_cleanup_removes_only_expired() {
        let limiter = limiter();
        limiter.check_and_charge("old", T0).await;
        limiter.check_and_charge("fresh", T0 + 30_000).await;

        let removed = limiter.cleanup(T0 + 60_000).await;
        assert_eq!(removed, 1);
        assert_eq!(limiter.len().await, 1);
        assert_eq!(limiter.last_charged("old").await, None);

        // Eviction never changes an outcome
        assert!(!limiter.check_and_charge("fresh", T0 + 60_000).await.is_allowed());
        assert!(limiter.check_and_charge("old", T0 + 60_000).await.is_allowed());
    }

    #[tokio::test]
    async fn test_concurrent_same_client_admits_one() {
        let limiter = limiter();
        let mut handles = Vec::new();
        for _ in 0..32 {
            let limiter = limiter.clone();
            handles.push(tokio::spawn(async move {
                limiter.check_and_charge("racer", T0).await
            }));
        }

        let mut allowed = 0;
        for handle in handles {
            if handle.await.unwrap().is_allowed() {
                allowed += 1;
            }
        }
        assert_eq!(allowed, 1);
    }
}
