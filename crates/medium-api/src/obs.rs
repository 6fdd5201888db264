//! Structured observability hooks for API traffic.
//!
//! This module provides:
//! - Endpoint-scoped tracing spans via `RequestSpan` RAII guard
//! - Emission functions for request completion, retries and bulk fetches
//!
//! Events are emitted at `debug!`/`info!` level (filter with `RUST_LOG`).

use tracing::{debug, info, warn};

/// RAII guard that enters an endpoint-scoped tracing span.
///
/// # Example
///
/// ```ignore
/// let _span = RequestSpan::enter("/user/1985b61817c3");
/// // tracing calls are now associated with endpoint = "/user/1985b61817c3"
/// ```
pub struct RequestSpan {
    _span: tracing::span::EnteredSpan,
}

impl RequestSpan {
    /// Create and enter a span tagged with the endpoint.
    pub fn enter(endpoint: &str) -> Self {
        let span = tracing::debug_span!("medium.request", endpoint = %endpoint);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: a request completed with a status code.
pub fn emit_request_completed(endpoint: &str, status: u16, elapsed_ms: u64, attempt: u32) {
    debug!(
        event = "request.completed",
        endpoint = %endpoint,
        status = status,
        elapsed_ms = elapsed_ms,
        attempt = attempt,
    );
}

/// Emit event: a 200 response carried an error payload and will be retried.
pub fn emit_retry_scheduled(endpoint: &str, attempt: u32, delay_ms: u64, message: &str) {
    warn!(
        event = "request.retry",
        endpoint = %endpoint,
        attempt = attempt,
        delay_ms = delay_ms,
        message = %message,
    );
}

/// Emit event: the API answered with a non-200 status.
pub fn emit_unexpected_status(endpoint: &str, status: u16) {
    warn!(event = "request.bad_status", endpoint = %endpoint, status = status);
}

/// Emit event: a bulk fill of resource handles finished.
pub fn emit_bulk_fetch_finished(kind: &str, requested: usize, fetched: usize, elapsed_ms: u64) {
    info!(
        event = "bulk.finished",
        kind = %kind,
        requested = requested,
        fetched = fetched,
        elapsed_ms = elapsed_ms,
    );
}
