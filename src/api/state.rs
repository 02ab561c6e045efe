use std::sync::Arc;

use crate::catalog::Catalog;
use crate::services::{ChatProvider, RateLimiter};

/// Shared application state
///
/// Everything here is read-only per request except the rate limiter, which is
/// the only mutable state shared across concurrent requests.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub provider: Arc<dyn ChatProvider>,
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Creates application state over a catalog and chat provider
    pub fn new(catalog: Catalog, provider: Arc<dyn ChatProvider>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            provider,
            limiter: Arc::new(RateLimiter::default()),
        }
    }

    /// Replaces the rate limiter (tests use tighter windows)
    pub fn with_limiter(mut self, limiter: RateLimiter) -> Self {
        self.limiter = Arc::new(limiter);
        self
    }
}
