use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::http::HeaderValue;
use secrecy::SecretString;
use url::Url;

use crate::{
    adapters::http::app_state::AppState,
    application::{
        ports::payment_provider::WebhookEventVerifier, use_cases::webhook::WebhookUseCases,
    },
    infra::{
        config::AppConfig,
        stripe_webhook::{StripeWebhookVerifier, compute_signature},
    },
};

use super::{InMemoryEmailSender, RecordingBillingMutator};

pub const TEST_WEBHOOK_SECRET: &str = "whsec_test_secret";
pub const TEST_EMAIL_FROM: &str = "team@paperai.life";
pub const TEST_APP_ORIGIN: &str = "https://paperai.life";

pub fn test_verifier() -> Arc<dyn WebhookEventVerifier> {
    Arc::new(StripeWebhookVerifier::default())
}

/// `stripe-signature` header for `payload`, signed now with `secret`.
pub fn sign_payload(payload: &str, secret: &str) -> String {
    let timestamp = chrono::Utc::now().timestamp();
    let signature = compute_signature(secret, timestamp, payload).unwrap();
    format!("t={timestamp},v1={signature}")
}

pub fn test_config() -> AppConfig {
    AppConfig {
        stripe_webhook_secret: SecretString::new(TEST_WEBHOOK_SECRET.into()),
        stripe_secret_key: SecretString::new("sk_test_123".into()),
        resend_api_key: SecretString::new("re_test_123".into()),
        database_url: "postgres://localhost/billing_test".to_string(),
        email_from: TEST_EMAIL_FROM.to_string(),
        app_origin: Url::parse(TEST_APP_ORIGIN).unwrap(),
        cors_origin: HeaderValue::from_static("http://localhost:3000"),
        bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 3001)),
        webhook_tolerance_secs: 300,
        log_file: "test.log".to_string(),
    }
}

/// Builder for AppState wired with recording fakes and the real signature
/// verifier.
pub struct TestAppStateBuilder {
    mutator: Arc<RecordingBillingMutator>,
    email_sender: Arc<InMemoryEmailSender>,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self {
            mutator: Arc::new(RecordingBillingMutator::new()),
            email_sender: Arc::new(InMemoryEmailSender::new()),
        }
    }

    pub fn with_mutator(mut self, mutator: Arc<RecordingBillingMutator>) -> Self {
        self.mutator = mutator;
        self
    }

    pub fn with_email_sender(mut self, email_sender: Arc<InMemoryEmailSender>) -> Self {
        self.email_sender = email_sender;
        self
    }

    /// Returns the state plus the mutator and email fakes for assertions.
    pub fn build_with_mocks(
        self,
    ) -> (
        AppState,
        Arc<RecordingBillingMutator>,
        Arc<InMemoryEmailSender>,
    ) {
        let mutator = self.mutator.clone();
        let email_sender = self.email_sender.clone();
        (self.build(), mutator, email_sender)
    }

    pub fn build(self) -> AppState {
        let config = test_config();

        let webhook_use_cases = WebhookUseCases::new(
            test_verifier(),
            self.mutator,
            self.email_sender,
            SecretString::new(TEST_WEBHOOK_SECRET.into()),
            config.email_from.clone(),
            config.app_origin.to_string(),
        );

        AppState {
            config: Arc::new(config),
            webhook_use_cases: Arc::new(webhook_use_cases),
        }
    }
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
