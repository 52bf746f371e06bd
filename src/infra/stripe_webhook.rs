use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::application::ports::payment_provider::{VerificationError, WebhookEventVerifier};
use crate::domain::entities::stripe_event::StripeEvent;

pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Verifies the `stripe-signature` header (`t=<unix>,v1=<hex>[,v1=...]`)
/// against an HMAC-SHA256 of `"<t>.<payload>"`.
#[derive(Debug, Clone, Copy)]
pub struct StripeWebhookVerifier {
    tolerance_secs: i64,
}

impl Default for StripeWebhookVerifier {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE_SECS)
    }
}

impl StripeWebhookVerifier {
    pub fn new(tolerance_secs: i64) -> Self {
        Self { tolerance_secs }
    }

    pub fn construct_event_at(
        &self,
        payload: &str,
        signature_header: &str,
        secret: &str,
        now: i64,
    ) -> Result<StripeEvent, VerificationError> {
        let header = SignatureHeader::parse(signature_header)?;

        let expected = compute_signature(secret, header.timestamp, payload)
            .ok_or(VerificationError::NoSignatureMatch)?;
        if !header
            .signatures
            .iter()
            .any(|sig| constant_time_compare(sig, &expected))
        {
            return Err(VerificationError::NoSignatureMatch);
        }

        if self.tolerance_secs > 0 && (now - header.timestamp).abs() > self.tolerance_secs {
            return Err(VerificationError::TimestampOutsideTolerance);
        }

        serde_json::from_str(payload).map_err(|e| VerificationError::InvalidPayload(e.to_string()))
    }
}

impl WebhookEventVerifier for StripeWebhookVerifier {
    fn construct_event(
        &self,
        payload: &str,
        signature_header: &str,
        secret: &str,
    ) -> Result<StripeEvent, VerificationError> {
        let now = chrono::Utc::now().timestamp();
        self.construct_event_at(payload, signature_header, secret, now)
    }
}

struct SignatureHeader<'a> {
    timestamp: i64,
    signatures: Vec<&'a str>,
}

impl<'a> SignatureHeader<'a> {
    fn parse(header: &'a str) -> Result<Self, VerificationError> {
        let mut timestamp = None;
        let mut signatures = Vec::new();

        for part in header.split(',') {
            let Some((key, value)) = part.trim().split_once('=') else {
                continue;
            };
            match key {
                "t" => timestamp = value.parse::<i64>().ok(),
                "v1" => signatures.push(value),
                // v0 and future schemes are ignored
                _ => {}
            }
        }

        match timestamp {
            Some(timestamp) if !signatures.is_empty() => Ok(Self {
                timestamp,
                signatures,
            }),
            _ => Err(VerificationError::MalformedHeader),
        }
    }
}

/// Hex-encoded `v1` signature for `payload` signed at `timestamp`.
pub fn compute_signature(secret: &str, timestamp: i64, payload: &str) -> Option<String> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload.as_bytes());
    Some(hex::encode(mac.finalize().into_bytes()))
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
