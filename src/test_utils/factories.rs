//! Test data factories for creating valid test fixtures.
//!
//! Typed factories take a closure to override specific fields. The
//! `*_object` helpers build raw `data.object` JSON the way the provider
//! sends it, for feeding through the verifier and router.

use std::collections::HashMap;

use serde_json::{Value as JsonValue, json};

use crate::domain::entities::{
    price::{PriceRecurring, PricingInterval, PricingType, StripePrice},
    product::StripeProduct,
    stripe_event::{StripeEvent, StripeEventData},
    subscription::{
        StripePriceRef, StripeSubscription, StripeSubscriptionItem, StripeSubscriptionItems,
    },
};

pub const TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Create a test product with sensible defaults.
pub fn create_test_product(overrides: impl FnOnce(&mut StripeProduct)) -> StripeProduct {
    let mut product = StripeProduct {
        id: "prod_test_1".to_string(),
        active: true,
        name: "Basic".to_string(),
        description: Some("Basic plan".to_string()),
        images: vec!["https://files.example.com/basic.png".to_string()],
        metadata: HashMap::new(),
    };
    overrides(&mut product);
    product
}

/// Create a monthly recurring test price with sensible defaults.
pub fn create_test_price(overrides: impl FnOnce(&mut StripePrice)) -> StripePrice {
    let mut price = StripePrice {
        id: "price_test_1".to_string(),
        product: "prod_test_1".to_string(),
        active: true,
        currency: "usd".to_string(),
        nickname: None,
        pricing_type: PricingType::Recurring,
        unit_amount: Some(999),
        recurring: Some(PriceRecurring {
            interval: PricingInterval::Month,
            interval_count: 1,
            trial_period_days: None,
        }),
        metadata: HashMap::new(),
    };
    overrides(&mut price);
    price
}

/// Create an active test subscription for `cus_test_1` on `price_test_1`.
pub fn create_test_subscription(
    overrides: impl FnOnce(&mut StripeSubscription),
) -> StripeSubscription {
    let mut subscription = StripeSubscription {
        id: "sub_test_1".to_string(),
        customer: "cus_test_1".to_string(),
        status: "active".to_string(),
        metadata: HashMap::new(),
        cancel_at_period_end: false,
        cancel_at: None,
        canceled_at: None,
        ended_at: None,
        created: TEST_TIMESTAMP,
        current_period_start: Some(TEST_TIMESTAMP),
        current_period_end: Some(TEST_TIMESTAMP + 30 * 24 * 60 * 60),
        trial_start: None,
        trial_end: None,
        items: StripeSubscriptionItems {
            data: vec![StripeSubscriptionItem {
                id: "si_test_1".to_string(),
                price: StripePriceRef {
                    id: "price_test_1".to_string(),
                },
                quantity: Some(1),
            }],
        },
        default_payment_method: None,
    };
    overrides(&mut subscription);
    subscription
}

// ============================================================================
// Raw event payloads
// ============================================================================

pub fn product_object() -> JsonValue {
    serde_json::to_value(create_test_product(|_| {})).unwrap_or(JsonValue::Null)
}

pub fn price_object() -> JsonValue {
    serde_json::to_value(create_test_price(|_| {})).unwrap_or(JsonValue::Null)
}

pub fn subscription_object() -> JsonValue {
    serde_json::to_value(create_test_subscription(|_| {})).unwrap_or(JsonValue::Null)
}

/// Completed checkout session in the given mode; `email` goes into
/// `customer_details`.
pub fn checkout_session_object(mode: &str, email: Option<&str>) -> JsonValue {
    json!({
        "id": "cs_test_1",
        "object": "checkout.session",
        "mode": mode,
        "customer": "cus_test_1",
        "subscription": if mode == "subscription" { json!("sub_test_1") } else { JsonValue::Null },
        "payment_intent": if mode == "payment" { json!("pi_test_1") } else { JsonValue::Null },
        "customer_details": { "email": email, "name": "Ada Lovelace" },
    })
}

pub fn test_event(event_type: &str, object: JsonValue) -> StripeEvent {
    StripeEvent {
        id: "evt_test_1".to_string(),
        event_type: event_type.to_string(),
        created: TEST_TIMESTAMP,
        livemode: false,
        data: StripeEventData { object },
    }
}

/// Serialized event envelope, ready to be signed.
pub fn test_event_payload(event_type: &str, object: JsonValue) -> String {
    json!({
        "id": "evt_test_1",
        "object": "event",
        "type": event_type,
        "created": TEST_TIMESTAMP,
        "livemode": false,
        "data": { "object": object },
    })
    .to_string()
}
