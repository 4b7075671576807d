//! Sticky per-address brute-force limiter.
//!
//! Counts consecutive authentication failures per client network address.
//! Once the count exceeds the threshold, the address stays blocked for the
//! remainder of the process lifetime: there is no decay, sliding window, or
//! manual reset. That trades precision for simplicity, acceptable because
//! the protected resource is a single shared secret rather than per-user
//! logins.
//!
//! Counters are best-effort: concurrent increments may race, and a slightly
//! stale or overcounted value only affects lockout precision, never its
//! correctness.

use dashmap::DashMap;

/// Default number of failures an address may accumulate before lockout.
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 10;

/// Process-lifetime failure counter keyed by client address.
///
/// Constructed once at startup and handed to the gateway; nothing else
/// reads or writes the counters.
#[derive(Debug)]
pub struct RateLimiter {
    failures: DashMap<String, u32>,
    threshold: u32,
}

impl RateLimiter {
    /// Create a limiter with the given failure threshold.
    pub fn new(threshold: u32) -> Self {
        Self {
            failures: DashMap::new(),
            threshold,
        }
    }

    /// The configured failure threshold.
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Whether the stored failure count for `client_key` exceeds the
    /// threshold. Unseen keys are never limited.
    pub fn is_rate_limited(&self, client_key: &str) -> bool {
        self.failures
            .get(client_key)
            .is_some_and(|count| *count > self.threshold)
    }

    /// Record one authentication failure for `client_key`, initializing the
    /// count to zero first if the key is unseen.
    pub fn record_failure(&self, client_key: &str) {
        *self.failures.entry(client_key.to_string()).or_insert(0) += 1;
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_FAILURE_THRESHOLD)
    }
}
