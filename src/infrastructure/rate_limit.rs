//! Rate limiter implementation
//!
//! Provides fixed window rate limiting keyed by client address.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

/// Result of a rate limit check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitResult {
    /// Whether the request is allowed
    pub allowed: bool,
    /// Remaining requests in the current window
    pub remaining: u32,
    /// Total limit for the window
    pub limit: u32,
    /// Time until the window resets (in seconds)
    pub reset_in_seconds: u64,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    hits: u32,
}

/// Fixed window rate limiter
///
/// Every request counts against its key's window, blocked ones included.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    windows: RwLock<HashMap<String, Window>>,
    last_cleanup: RwLock<Instant>,
}

impl RateLimiter {
    /// Create a limiter allowing `max_requests` per `window` for each key
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: RwLock::new(HashMap::new()),
            last_cleanup: RwLock::new(Instant::now()),
        }
    }

    pub fn limit(&self) -> u32 {
        self.max_requests
    }

    /// Count a request for `key` and report whether it may proceed
    pub async fn check_and_record(&self, key: &str) -> RateLimitResult {
        self.maybe_cleanup().await;

        let now = Instant::now();
        let mut windows = self.windows.write().await;

        let entry = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            hits: 0,
        });

        if now.duration_since(entry.started) >= self.window {
            *entry = Window {
                started: now,
                hits: 0,
            };
        }

        entry.hits = entry.hits.saturating_add(1);

        let elapsed = now.duration_since(entry.started);
        let reset_in = self.window.saturating_sub(elapsed);

        RateLimitResult {
            allowed: entry.hits <= self.max_requests,
            remaining: self.max_requests.saturating_sub(entry.hits),
            limit: self.max_requests,
            reset_in_seconds: reset_in.as_secs() + u64::from(reset_in.subsec_nanos() > 0),
        }
    }

    /// Forget the window for a key
    pub async fn reset(&self, key: &str) {
        self.windows.write().await.remove(key);
    }

    async fn maybe_cleanup(&self) {
        let should_cleanup = {
            let last = self.last_cleanup.read().await;
            last.elapsed() >= self.window
        };

        if should_cleanup {
            *self.last_cleanup.write().await = Instant::now();

            let window = self.window;
            self.windows
                .write()
                .await
                .retain(|_, w| w.started.elapsed() < window);
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(100, Duration::from_secs(15 * 60))
    }
}
