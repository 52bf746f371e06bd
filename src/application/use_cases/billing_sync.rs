use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value as JsonValue;
use tracing::instrument;
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::application::ports::payment_provider::SubscriptionSource;
use crate::domain::entities::{
    price::StripePrice,
    product::StripeProduct,
    subscription::{StripeSubscription, SubscriptionStatus, SubscriptionUpsertRequest},
};

// ============================================================================
// Mutator Port
// ============================================================================

/// Idempotent domain mutations applied by the webhook router.
///
/// Every method may be called more than once with identical arguments when
/// the provider redelivers an event; implementations must converge to the
/// same stored state.
#[async_trait]
pub trait BillingMutator: Send + Sync {
    async fn upsert_product(&self, product: &StripeProduct) -> AppResult<()>;

    async fn upsert_price(&self, price: &StripePrice) -> AppResult<()>;

    async fn upsert_user_subscription(&self, request: &SubscriptionUpsertRequest)
    -> AppResult<()>;
}

// ============================================================================
// Repository Traits
// ============================================================================

#[async_trait]
pub trait BillingRepoTrait: Send + Sync {
    async fn upsert_product(&self, product: &StripeProduct) -> AppResult<()>;

    async fn upsert_price(&self, price: &StripePrice) -> AppResult<()>;

    async fn find_user_id_by_customer(&self, stripe_customer_id: &str) -> AppResult<Option<Uuid>>;

    async fn upsert_subscription(&self, record: &SubscriptionRecord) -> AppResult<()>;

    async fn update_user_billing_details(
        &self,
        user_id: Uuid,
        details: &BillingDetails,
    ) -> AppResult<()>;
}

// ============================================================================
// Records
// ============================================================================

/// Row written to `subscriptions` for one provider subscription.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionRecord {
    pub id: String,
    pub user_id: Uuid,
    pub status: SubscriptionStatus,
    pub metadata: HashMap<String, String>,
    pub price_id: Option<String>,
    pub quantity: Option<i64>,
    pub cancel_at_period_end: bool,
    pub created: Option<NaiveDateTime>,
    pub current_period_start: Option<NaiveDateTime>,
    pub current_period_end: Option<NaiveDateTime>,
    pub ended_at: Option<NaiveDateTime>,
    pub cancel_at: Option<NaiveDateTime>,
    pub canceled_at: Option<NaiveDateTime>,
    pub trial_start: Option<NaiveDateTime>,
    pub trial_end: Option<NaiveDateTime>,
}

impl SubscriptionRecord {
    pub fn from_stripe(user_id: Uuid, subscription: &StripeSubscription) -> Self {
        Self {
            id: subscription.id.clone(),
            user_id,
            status: subscription.status(),
            metadata: subscription.metadata.clone(),
            price_id: subscription.price_id().map(str::to_string),
            quantity: subscription.quantity(),
            cancel_at_period_end: subscription.cancel_at_period_end,
            created: timestamp_to_naive(subscription.created),
            current_period_start: subscription.current_period_start.and_then(timestamp_to_naive),
            current_period_end: subscription.current_period_end.and_then(timestamp_to_naive),
            ended_at: subscription.ended_at.and_then(timestamp_to_naive),
            cancel_at: subscription.cancel_at.and_then(timestamp_to_naive),
            canceled_at: subscription.canceled_at.and_then(timestamp_to_naive),
            trial_start: subscription.trial_start.and_then(timestamp_to_naive),
            trial_end: subscription.trial_end.and_then(timestamp_to_naive),
        }
    }
}

/// Billing details copied onto the user when a subscription is first created.
#[derive(Debug, Clone, PartialEq)]
pub struct BillingDetails {
    pub billing_address: JsonValue,
    pub payment_method: JsonValue,
}

impl BillingDetails {
    /// Extract billing details from an expanded payment method object.
    ///
    /// Returns `None` unless name, phone and address are all present, or
    /// when the payment method was not expanded.
    pub fn from_payment_method(payment_method: &JsonValue) -> Option<Self> {
        let details = payment_method.get("billing_details")?;
        let present = |key: &str| details.get(key).filter(|v| !v.is_null());

        present("name")?;
        present("phone")?;
        let address = present("address")?.clone();

        let method_type = payment_method.get("type")?.as_str()?;
        let method = payment_method
            .get(method_type)
            .cloned()
            .unwrap_or(JsonValue::Null);

        Some(Self {
            billing_address: address,
            payment_method: method,
        })
    }
}

/// Convert a Unix timestamp to NaiveDateTime
fn timestamp_to_naive(secs: i64) -> Option<NaiveDateTime> {
    if secs <= 0 {
        return None;
    }
    DateTime::<Utc>::from_timestamp(secs, 0).map(|dt| dt.naive_utc())
}

// ============================================================================
// Use Cases
// ============================================================================

/// Live domain mutator: persists catalog objects verbatim and reconciles
/// subscriptions against the provider's current state.
#[derive(Clone)]
pub struct BillingSyncUseCases {
    repo: Arc<dyn BillingRepoTrait>,
    subscriptions: Arc<dyn SubscriptionSource>,
}

impl BillingSyncUseCases {
    pub fn new(
        repo: Arc<dyn BillingRepoTrait>,
        subscriptions: Arc<dyn SubscriptionSource>,
    ) -> Self {
        Self {
            repo,
            subscriptions,
        }
    }
}

#[async_trait]
impl BillingMutator for BillingSyncUseCases {
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    async fn upsert_product(&self, product: &StripeProduct) -> AppResult<()> {
        self.repo.upsert_product(product).await?;
        tracing::info!("Product inserted/updated");
        Ok(())
    }

    #[instrument(skip(self, price), fields(price_id = %price.id))]
    async fn upsert_price(&self, price: &StripePrice) -> AppResult<()> {
        self.repo.upsert_price(price).await?;
        tracing::info!("Price inserted/updated");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn upsert_user_subscription(
        &self,
        request: &SubscriptionUpsertRequest,
    ) -> AppResult<()> {
        let user_id = self
            .repo
            .find_user_id_by_customer(&request.customer_id)
            .await?
            .ok_or_else(|| {
                AppError::InvalidInput(format!(
                    "No user found for customer {}",
                    request.customer_id
                ))
            })?;

        let subscription = self
            .subscriptions
            .retrieve_subscription(&request.subscription_id)
            .await?;

        if subscription.customer != request.customer_id {
            return Err(AppError::InvalidInput(format!(
                "Subscription {} does not belong to customer {}",
                subscription.id, request.customer_id
            )));
        }

        let record = SubscriptionRecord::from_stripe(user_id, &subscription);
        self.repo.upsert_subscription(&record).await?;
        tracing::info!(
            %user_id,
            status = record.status.as_str(),
            "Subscription inserted/updated"
        );

        if request.is_create_action {
            match subscription
                .default_payment_method
                .as_ref()
                .and_then(BillingDetails::from_payment_method)
            {
                Some(details) => {
                    self.repo
                        .update_user_billing_details(user_id, &details)
                        .await?;
                }
                None => {
                    tracing::debug!("No complete billing details on payment method, skipping copy");
                }
            }
        }

        Ok(())
    }
}
