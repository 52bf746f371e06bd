use async_trait::async_trait;
use thiserror::Error;

use crate::{
    app_error::AppResult,
    domain::entities::{stripe_event::StripeEvent, subscription::StripeSubscription},
};

// ============================================================================
// Verification
// ============================================================================

/// Reasons an inbound webhook is rejected before any event is trusted.
///
/// Display strings are returned to the caller inside the 400 response body,
/// so they must never contain the secret or the expected signature.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Missing stripe-signature header")]
    MissingSignature,

    #[error("Webhook secret is not configured")]
    MissingSecret,

    #[error("Unable to extract timestamp and signatures from header")]
    MalformedHeader,

    #[error("No signatures found matching the expected signature for payload")]
    NoSignatureMatch,

    #[error("Timestamp outside the tolerance zone")]
    TimestampOutsideTolerance,

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

/// Turns a raw request body plus signature header into a trusted event.
///
/// Implementations must not perform network I/O; verification is a pure
/// function of the payload, header, secret and current time.
pub trait WebhookEventVerifier: Send + Sync {
    fn construct_event(
        &self,
        payload: &str,
        signature_header: &str,
        secret: &str,
    ) -> Result<StripeEvent, VerificationError>;
}

// ============================================================================
// Subscription lookups
// ============================================================================

/// Read access to the provider's view of a subscription.
///
/// Webhook payloads only carry a reference for checkout sessions, so the
/// authoritative subscription state is always fetched from the provider.
#[async_trait]
pub trait SubscriptionSource: Send + Sync {
    async fn retrieve_subscription(&self, subscription_id: &str) -> AppResult<StripeSubscription>;
}
