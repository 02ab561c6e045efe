use std::collections::HashMap;
use std::time::{Duration, Instant};

use axum::http::HeaderMap;
use tokio::sync::Mutex;

/// Sliding admission window
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);

/// Maximum admitted calls per identity within the window
pub const MAX_REQUESTS_PER_WINDOW: usize = 10;

/// Per-caller sliding-window admission control
///
/// State is process-local and grows with the number of distinct identities
/// over the process lifetime (no eviction); acceptable at this scale. A
/// multi-process deployment would need an external shared store instead.
pub struct RateLimiter {
    window: Duration,
    max_requests: usize,
    requests: Mutex<HashMap<String, Vec<Instant>>>,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: usize) -> Self {
        Self {
            window,
            max_requests,
            requests: Mutex::new(HashMap::new()),
        }
    }

    /// Checks and records an admission for the given identity
    ///
    /// Timestamps older than the window are discarded before the count check;
    /// an admitted call records a fresh timestamp.
    pub async fn admit(&self, identity: &str) -> bool {
        let now = Instant::now();
        let mut requests = self.requests.lock().await;
        let timestamps = requests.entry(identity.to_string()).or_default();

        timestamps.retain(|t| now.duration_since(*t) < self.window);

        if timestamps.len() >= self.max_requests {
            tracing::warn!(identity, "rate limit exceeded");
            return false;
        }

        timestamps.push(now);
        true
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RATE_LIMIT_WINDOW, MAX_REQUESTS_PER_WINDOW)
    }
}

/// Derives the caller identity used for rate limiting
///
/// Prefers the first `x-forwarded-for` entry, then `x-real-ip`. Callers with
/// neither share a single "unknown" bucket; coarse, but accepted behavior.
pub fn client_identity(headers: &HeaderMap) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }

    "unknown".to_string()
}
