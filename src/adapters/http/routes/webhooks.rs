//! Stripe webhook endpoint.

use axum::{
    Json, Router,
    extract::State,
    http::HeaderMap,
    routing::post,
};
use serde_json::{Value, json};

use crate::{adapters::http::app_state::AppState, app_error::AppResult};

const SIGNATURE_HEADER: &str = "stripe-signature";

pub fn router() -> Router<AppState> {
    Router::new().route("/webhooks", post(receive_webhook))
}

/// POST /api/webhooks
///
/// The body is taken as raw text: the signature covers the exact bytes
/// Stripe sent.
async fn receive_webhook(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> AppResult<Json<Value>> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    app_state
        .webhook_use_cases
        .handle(&body, signature)
        .await?;

    Ok(Json(json!({ "received": true })))
}
