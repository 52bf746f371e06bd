//! HTTP client factory with consistent timeout configuration.
//!
//! Outbound clients (Stripe, Resend) are built here rather than with
//! `reqwest::Client::new()`, so that every call carries a timeout.

use reqwest::Client;
use std::time::Duration;

/// Default connect timeout (TCP handshake + TLS).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default request timeout (total request/response time).
///
/// Stripe redelivers a webhook whose handler does not answer in time, so
/// outbound calls made while handling one must finish well within that.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn try_build_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
        .timeout(DEFAULT_REQUEST_TIMEOUT)
        .build()
}
