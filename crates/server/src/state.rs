use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderMap;
use service::decisions::{DecisionService, RequestContext};

/// Header carrying the caller's remaining time budget in milliseconds.
pub const REQUEST_TIMEOUT_HEADER: &str = "x-request-timeout-ms";

#[derive(Clone)]
pub struct AppState {
    pub decisions: Arc<DecisionService>,
    /// Deadline used when the caller sends none
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(decisions: Arc<DecisionService>, request_timeout: Duration) -> Self {
        Self { decisions, request_timeout }
    }

    /// Deadline for this request: the caller's header if valid, else the configured default.
    pub fn request_context(&self, headers: &HeaderMap) -> RequestContext {
        let timeout = headers
            .get(REQUEST_TIMEOUT_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(self.request_timeout);
        RequestContext::with_timeout(timeout)
    }
}
