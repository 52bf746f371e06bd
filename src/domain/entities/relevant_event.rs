use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Stripe event types this service reconciles. Every other type is
/// acknowledged and ignored.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
pub enum RelevantEventType {
    #[strum(serialize = "product.created")]
    ProductCreated,
    #[strum(serialize = "product.updated")]
    ProductUpdated,
    #[strum(serialize = "price.created")]
    PriceCreated,
    #[strum(serialize = "price.updated")]
    PriceUpdated,
    #[strum(serialize = "checkout.session.completed")]
    CheckoutSessionCompleted,
    #[strum(serialize = "customer.subscription.created")]
    SubscriptionCreated,
    #[strum(serialize = "customer.subscription.updated")]
    SubscriptionUpdated,
    #[strum(serialize = "customer.subscription.deleted")]
    SubscriptionDeleted,
}

impl RelevantEventType {
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    pub fn parse(event_type: &str) -> Option<Self> {
        event_type.parse().ok()
    }
}
