use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::app_error::{AppError, AppResult};
use crate::application::ports::payment_provider::SubscriptionSource;
use crate::domain::entities::subscription::StripeSubscription;

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

pub struct StripeClient {
    client: Client,
    secret_key: SecretString,
}

impl StripeClient {
    pub fn new(client: Client, secret_key: SecretString) -> Self {
        Self {
            client,
            secret_key,
        }
    }

    fn auth_header(&self) -> String {
        use base64::Engine;
        let encoded = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:", self.secret_key.expose_secret()));
        format!("Basic {}", encoded)
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    /// Fetch a subscription with its default payment method expanded.
    pub async fn get_subscription(&self, subscription_id: &str) -> AppResult<StripeSubscription> {
        let response = self
            .client
            .get(format!("{}/subscriptions/{}", STRIPE_API_BASE, subscription_id))
            .header("Authorization", self.auth_header())
            .query(&[("expand[]", "default_payment_method")])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Stripe request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to read response: {}", e)))?;

        parse_response(status, &body)
    }
}

#[async_trait]
impl SubscriptionSource for StripeClient {
    async fn retrieve_subscription(&self, subscription_id: &str) -> AppResult<StripeSubscription> {
        self.get_subscription(subscription_id).await
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn parse_response<T: for<'de> Deserialize<'de>>(
    status: reqwest::StatusCode,
    body: &str,
) -> AppResult<T> {
    if !status.is_success() {
        tracing::error!(status = %status, body = %body, "Stripe API error");

        if let Ok(error) = serde_json::from_str::<StripeErrorResponse>(body) {
            return Err(AppError::Upstream(format!(
                "Stripe error: {}",
                error.error.message.unwrap_or(error.error.error_type)
            )));
        }

        return Err(AppError::Upstream(format!(
            "Stripe API error: {} - {}",
            status, body
        )));
    }

    serde_json::from_str(body).map_err(|e| {
        tracing::error!(body = %body, error = %e, "Failed to parse Stripe response");
        AppError::Upstream(format!("Failed to parse Stripe response: {}", e))
    })
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeErrorBody,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    #[serde(rename = "type")]
    error_type: String,
    #[serde(default)]
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn auth_header_is_basic_with_empty_password() {
        let client = StripeClient::new(Client::new(), SecretString::new("sk_test_123".into()));
        // base64("sk_test_123:")
        assert_eq!(client.auth_header(), "Basic c2tfdGVzdF8xMjM6");
    }

    #[test]
    fn success_body_parses_subscription() {
        let body = r#"{
            "id": "sub_1",
            "customer": "cus_1",
            "status": "trialing",
            "items": { "data": [ { "id": "si_1", "price": { "id": "price_1" }, "quantity": 2 } ] },
            "default_payment_method": { "id": "pm_1", "type": "card" }
        }"#;

        let sub: StripeSubscription = parse_response(StatusCode::OK, body).unwrap();
        assert_eq!(sub.id, "sub_1");
        assert_eq!(sub.price_id(), Some("price_1"));
        assert_eq!(sub.quantity(), Some(2));
        assert!(sub.default_payment_method.is_some());
    }

    #[test]
    fn stripe_error_body_becomes_upstream_error() {
        let body = r#"{"error":{"type":"invalid_request_error","message":"No such subscription: 'sub_x'"}}"#;
        let err = parse_response::<StripeSubscription>(StatusCode::NOT_FOUND, body).unwrap_err();

        assert!(matches!(err, AppError::Upstream(ref m) if m.contains("No such subscription")));
        assert!(err.is_retryable());
    }

    #[test]
    fn unparseable_error_body_is_still_upstream() {
        let err =
            parse_response::<StripeSubscription>(StatusCode::BAD_GATEWAY, "<html>").unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }
}
