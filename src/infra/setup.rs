use crate::{
    adapters::{
        email::resend::ResendEmailSender, http::app_state::AppState,
        persistence::PostgresPersistence,
    },
    application::use_cases::{
        billing_sync::{BillingRepoTrait, BillingSyncUseCases},
        webhook::WebhookUseCases,
    },
    infra::{
        config::AppConfig, db::init_db, error::InfraError, http_client::try_build_client,
        stripe_client::StripeClient, stripe_webhook::StripeWebhookVerifier,
    },
};
use secrecy::{ExposeSecret, SecretString};
use std::fs::File;
use std::sync::{Arc, Mutex};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub async fn init_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let pool = init_db(&config.database_url).await?;
    let repo = Arc::new(PostgresPersistence::new(pool)) as Arc<dyn BillingRepoTrait>;

    let http = try_build_client().map_err(InfraError::HttpClient)?;
    let stripe = Arc::new(StripeClient::new(
        http.clone(),
        copy_secret(&config.stripe_secret_key),
    ));
    let email = Arc::new(ResendEmailSender::new(
        http,
        copy_secret(&config.resend_api_key),
    ));

    let billing_sync = Arc::new(BillingSyncUseCases::new(repo, stripe));
    let verifier = Arc::new(StripeWebhookVerifier::new(config.webhook_tolerance_secs));

    let webhook_use_cases = WebhookUseCases::new(
        verifier,
        billing_sync,
        email,
        copy_secret(&config.stripe_webhook_secret),
        config.email_from.clone(),
        config.app_origin.to_string(),
    );

    Ok(AppState {
        config: Arc::new(config),
        webhook_use_cases: Arc::new(webhook_use_cases),
    })
}

fn copy_secret(secret: &SecretString) -> SecretString {
    SecretString::new(secret.expose_secret().into())
}

pub fn init_tracing(log_file: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "billing_webhook=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .pretty();

    // File (structured JSON logs); skipped when the file cannot be created
    let json_layer = match File::create(log_file) {
        Ok(file) => Some(
            fmt::layer()
                .json()
                .with_writer(Mutex::new(file))
                .with_current_span(true)
                .with_span_list(true),
        ),
        Err(e) => {
            eprintln!("cannot create log file {log_file}: {e}");
            None
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}
