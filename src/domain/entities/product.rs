use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Product object as delivered in `product.*` events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StripeProduct {
    pub id: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl StripeProduct {
    /// Only the first product image is stored.
    pub fn image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}
