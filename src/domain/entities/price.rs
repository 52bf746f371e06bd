use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "pricing_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PricingType {
    OneTime,
    Recurring,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "pricing_plan_interval", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PricingInterval {
    Day,
    Week,
    Month,
    Year,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRecurring {
    pub interval: PricingInterval,
    #[serde(default = "default_interval_count")]
    pub interval_count: i32,
    #[serde(default)]
    pub trial_period_days: Option<i32>,
}

fn default_interval_count() -> i32 {
    1
}

/// Price object as delivered in `price.*` events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StripePrice {
    pub id: String,
    pub product: String,
    #[serde(default)]
    pub active: bool,
    pub currency: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(rename = "type")]
    pub pricing_type: PricingType,
    #[serde(default)]
    pub unit_amount: Option<i64>,
    #[serde(default)]
    pub recurring: Option<PriceRecurring>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl StripePrice {
    pub fn interval(&self) -> Option<PricingInterval> {
        self.recurring.as_ref().map(|r| r.interval)
    }

    pub fn interval_count(&self) -> Option<i32> {
        self.recurring.as_ref().map(|r| r.interval_count)
    }

    pub fn trial_period_days(&self) -> Option<i32> {
        self.recurring.as_ref().and_then(|r| r.trial_period_days)
    }
}
