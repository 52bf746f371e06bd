use std::net::{Ipv4Addr, SocketAddr};

use axum::http::HeaderValue;
use env_helpers::get_env_default;
use secrecy::SecretString;
use url::Url;

use crate::infra::error::InfraError;

pub struct AppConfig {
    /// Signing secret of the Stripe webhook endpoint (`whsec_...`).
    pub stripe_webhook_secret: SecretString,
    /// Stripe API key, used to fetch the current subscription state.
    pub stripe_secret_key: SecretString,
    pub resend_api_key: SecretString,
    pub database_url: String,
    /// Sender address of the payment emails.
    pub email_from: String,
    /// Public site origin; payment emails link back to it.
    pub app_origin: Url,
    pub cors_origin: HeaderValue,
    pub bind_addr: SocketAddr,
    /// Maximum age of a signed webhook, in seconds.
    pub webhook_tolerance_secs: i64,
    pub log_file: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, InfraError> {
        let stripe_webhook_secret = SecretString::new(required("STRIPE_WEBHOOK_SECRET")?.into());
        let stripe_secret_key = SecretString::new(required("STRIPE_SECRET_KEY")?.into());
        let resend_api_key = SecretString::new(required("RESEND_API_KEY")?.into());
        let database_url = required("DATABASE_URL")?;

        let email_from: String = get_env_default("EMAIL_FROM", "team@paperai.life".to_string());
        let app_origin: Url =
            Url::parse(&get_env_default("APP_ORIGIN", "http://localhost:3000".to_string()))
                .map_err(|_| InfraError::ConfigInvalid { var: "APP_ORIGIN" })?;
        let cors_origin: HeaderValue =
            get_env_default("CORS_ORIGIN", String::from("http://localhost:3000"))
                .parse()
                .map_err(|_| InfraError::ConfigInvalid { var: "CORS_ORIGIN" })?;

        let bind_addr: SocketAddr = get_env_default(
            "BIND_ADDR",
            SocketAddr::from((Ipv4Addr::LOCALHOST, 3001)),
        );
        let webhook_tolerance_secs: i64 = get_env_default("WEBHOOK_TOLERANCE_SECS", 300);
        let log_file: String = get_env_default("LOG_FILE", "app.log".to_string());

        Ok(Self {
            stripe_webhook_secret,
            stripe_secret_key,
            resend_api_key,
            database_url,
            email_from,
            app_origin,
            cors_origin,
            bind_addr,
            webhook_tolerance_secs,
            log_file,
        })
    }
}

/// Reads a variable that has no sensible default. Blank counts as unset.
fn required(var: &'static str) -> Result<String, InfraError> {
    std::env::var(var)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(InfraError::ConfigMissing { var })
}
