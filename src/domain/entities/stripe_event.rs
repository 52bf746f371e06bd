use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::domain::entities::relevant_event::RelevantEventType;

/// Verified Stripe event envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub livemode: bool,
    pub data: StripeEventData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeEventData {
    pub object: serde_json::Value,
}

impl StripeEvent {
    /// The event type, if it is one this service acts on.
    pub fn relevant_type(&self) -> Option<RelevantEventType> {
        RelevantEventType::parse(&self.event_type)
    }

    /// Deserialize `data.object` into the payload type for this event.
    pub fn object<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.data.object)
    }
}
