//! In-memory mock implementations for the billing ports.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::{
        ports::payment_provider::SubscriptionSource,
        use_cases::billing_sync::{
            BillingDetails, BillingMutator, BillingRepoTrait, SubscriptionRecord,
        },
    },
    domain::entities::{
        price::StripePrice,
        product::StripeProduct,
        subscription::{StripeSubscription, SubscriptionUpsertRequest},
    },
};

// ============================================================================
// InMemoryBillingRepo
// ============================================================================

/// Keyed by provider id, so repeated upserts overwrite like the SQL
/// `ON CONFLICT` clauses do.
#[derive(Default)]
pub struct InMemoryBillingRepo {
    pub products: Mutex<HashMap<String, StripeProduct>>,
    pub prices: Mutex<HashMap<String, StripePrice>>,
    pub customers: Mutex<HashMap<String, Uuid>>,
    pub subscriptions: Mutex<HashMap<String, SubscriptionRecord>>,
    pub billing_details: Mutex<HashMap<Uuid, BillingDetails>>,
}

impl InMemoryBillingRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_customer(stripe_customer_id: &str, user_id: Uuid) -> Self {
        let repo = Self::default();
        repo.customers
            .lock()
            .unwrap()
            .insert(stripe_customer_id.to_string(), user_id);
        repo
    }
}

#[async_trait]
impl BillingRepoTrait for InMemoryBillingRepo {
    async fn upsert_product(&self, product: &StripeProduct) -> AppResult<()> {
        self.products
            .lock()
            .unwrap()
            .insert(product.id.clone(), product.clone());
        Ok(())
    }

    async fn upsert_price(&self, price: &StripePrice) -> AppResult<()> {
        self.prices
            .lock()
            .unwrap()
            .insert(price.id.clone(), price.clone());
        Ok(())
    }

    async fn find_user_id_by_customer(&self, stripe_customer_id: &str) -> AppResult<Option<Uuid>> {
        Ok(self
            .customers
            .lock()
            .unwrap()
            .get(stripe_customer_id)
            .copied())
    }

    async fn upsert_subscription(&self, record: &SubscriptionRecord) -> AppResult<()> {
        self.subscriptions
            .lock()
            .unwrap()
            .insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn update_user_billing_details(
        &self,
        user_id: Uuid,
        details: &BillingDetails,
    ) -> AppResult<()> {
        self.billing_details
            .lock()
            .unwrap()
            .insert(user_id, details.clone());
        Ok(())
    }
}

// ============================================================================
// InMemorySubscriptionSource
// ============================================================================

#[derive(Default)]
pub struct InMemorySubscriptionSource {
    pub subscriptions: Mutex<HashMap<String, StripeSubscription>>,
}

impl InMemorySubscriptionSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subscriptions(subscriptions: Vec<StripeSubscription>) -> Self {
        let map: HashMap<String, StripeSubscription> = subscriptions
            .into_iter()
            .map(|s| (s.id.clone(), s))
            .collect();
        Self {
            subscriptions: Mutex::new(map),
        }
    }
}

#[async_trait]
impl SubscriptionSource for InMemorySubscriptionSource {
    async fn retrieve_subscription(&self, subscription_id: &str) -> AppResult<StripeSubscription> {
        self.subscriptions
            .lock()
            .unwrap()
            .get(subscription_id)
            .cloned()
            .ok_or_else(|| {
                AppError::Upstream(format!("No such subscription: '{subscription_id}'"))
            })
    }
}

// ============================================================================
// RecordingBillingMutator
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum MutationCall {
    Product(StripeProduct),
    Price(StripePrice),
    Subscription(SubscriptionUpsertRequest),
}

/// Records every mutation in call order. In failing mode every call is
/// still recorded, then reported as a database error.
#[derive(Default)]
pub struct RecordingBillingMutator {
    calls: Mutex<Vec<MutationCall>>,
    fail: bool,
}

impl RecordingBillingMutator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<MutationCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: MutationCall) -> AppResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            return Err(AppError::Database("connection reset".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl BillingMutator for RecordingBillingMutator {
    async fn upsert_product(&self, product: &StripeProduct) -> AppResult<()> {
        self.record(MutationCall::Product(product.clone()))
    }

    async fn upsert_price(&self, price: &StripePrice) -> AppResult<()> {
        self.record(MutationCall::Price(price.clone()))
    }

    async fn upsert_user_subscription(
        &self,
        request: &SubscriptionUpsertRequest,
    ) -> AppResult<()> {
        self.record(MutationCall::Subscription(request.clone()))
    }
}
