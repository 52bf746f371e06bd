//! Stripe webhook reconciliation.
//!
//! A verified event is turned into a [`DispatchPlan`] by a pure planning
//! function looked up in the [`EventRouter`] table, then the plan's actions
//! are applied in order against the mutator and email ports.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use crate::app_error::{AppError, AppResult};
use crate::application::email_templates::{PaymentEmailKind, payment_success_email};
use crate::application::ports::{
    email_sender::{EmailSender, OutgoingEmail},
    payment_provider::{VerificationError, WebhookEventVerifier},
};
use crate::application::use_cases::billing_sync::BillingMutator;
use crate::domain::entities::{
    checkout_session::{CheckoutMode, StripeCheckoutSession},
    price::StripePrice,
    product::StripeProduct,
    relevant_event::RelevantEventType,
    stripe_event::StripeEvent,
    subscription::{StripeSubscription, SubscriptionUpsertRequest},
};

// ============================================================================
// Plans
// ============================================================================

/// One side effect requested by a planning function.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookAction {
    UpsertProduct(StripeProduct),
    UpsertPrice(StripePrice),
    UpsertSubscription(SubscriptionUpsertRequest),
    /// One-time payment; nothing is persisted, the intent id is logged.
    RecordPayment { payment_intent_id: Option<String> },
    SendPaymentEmail { to: String, kind: PaymentEmailKind },
}

/// Ordered actions for one event, plus an optional rejection raised after
/// every action has been applied. Applied actions are not rolled back.
#[derive(Debug, Default)]
pub struct DispatchPlan {
    pub actions: Vec<WebhookAction>,
    pub rejection: Option<AppError>,
}

impl DispatchPlan {
    fn single(action: WebhookAction) -> Self {
        Self {
            actions: vec![action],
            rejection: None,
        }
    }
}

pub type PlanFn = fn(&StripeEvent) -> AppResult<DispatchPlan>;

const MISSING_EMAIL: &str = "User email is missing in the checkout session.";

fn payload<T: serde::de::DeserializeOwned>(event: &StripeEvent) -> AppResult<T> {
    event.object().map_err(|e| {
        AppError::InvalidInput(format!("Invalid {} payload: {}", event.event_type, e))
    })
}

fn plan_product_upsert(event: &StripeEvent) -> AppResult<DispatchPlan> {
    let product: StripeProduct = payload(event)?;
    Ok(DispatchPlan::single(WebhookAction::UpsertProduct(product)))
}

fn plan_price_upsert(event: &StripeEvent) -> AppResult<DispatchPlan> {
    let price: StripePrice = payload(event)?;
    Ok(DispatchPlan::single(WebhookAction::UpsertPrice(price)))
}

/// Created, updated and deleted all reconcile the same way; the mutator
/// reads the deleted status from the provider.
fn plan_subscription_upsert(event: &StripeEvent) -> AppResult<DispatchPlan> {
    let subscription: StripeSubscription = payload(event)?;
    Ok(DispatchPlan::single(WebhookAction::UpsertSubscription(
        SubscriptionUpsertRequest {
            subscription_id: subscription.id,
            customer_id: subscription.customer,
            is_create_action: false,
        },
    )))
}

fn plan_checkout_completed(event: &StripeEvent) -> AppResult<DispatchPlan> {
    let session: StripeCheckoutSession = payload(event)?;
    let email = session.customer_email().map(str::to_string);

    let (mut actions, kind) = match session.mode {
        CheckoutMode::Subscription => {
            let subscription_id = session.subscription.clone().ok_or_else(|| {
                AppError::InvalidInput("Subscription checkout without a subscription id".into())
            })?;
            let customer_id = session.customer.clone().ok_or_else(|| {
                AppError::InvalidInput("Subscription checkout without a customer id".into())
            })?;
            let upsert = WebhookAction::UpsertSubscription(SubscriptionUpsertRequest {
                subscription_id,
                customer_id,
                is_create_action: true,
            });
            (vec![upsert], PaymentEmailKind::Welcome)
        }
        CheckoutMode::Payment => (Vec::new(), PaymentEmailKind::PurchaseConfirmation),
        CheckoutMode::Setup | CheckoutMode::Unknown => return Ok(DispatchPlan::default()),
    };

    let Some(to) = email else {
        return Ok(DispatchPlan {
            actions,
            rejection: Some(AppError::InvalidInput(MISSING_EMAIL.into())),
        });
    };

    if session.mode == CheckoutMode::Payment {
        actions.push(WebhookAction::RecordPayment {
            payment_intent_id: session.payment_intent.clone(),
        });
    }
    actions.push(WebhookAction::SendPaymentEmail { to, kind });

    Ok(DispatchPlan {
        actions,
        rejection: None,
    })
}

// ============================================================================
// Router
// ============================================================================

/// Lookup table from relevant event type to its planning function.
#[derive(Clone)]
pub struct EventRouter {
    routes: Vec<(RelevantEventType, PlanFn)>,
}

const DEFAULT_ROUTES: [(RelevantEventType, PlanFn); 8] = [
    (RelevantEventType::ProductCreated, plan_product_upsert),
    (RelevantEventType::ProductUpdated, plan_product_upsert),
    (RelevantEventType::PriceCreated, plan_price_upsert),
    (RelevantEventType::PriceUpdated, plan_price_upsert),
    (RelevantEventType::SubscriptionCreated, plan_subscription_upsert),
    (RelevantEventType::SubscriptionUpdated, plan_subscription_upsert),
    (RelevantEventType::SubscriptionDeleted, plan_subscription_upsert),
    (RelevantEventType::CheckoutSessionCompleted, plan_checkout_completed),
];

impl Default for EventRouter {
    fn default() -> Self {
        Self::with_routes(DEFAULT_ROUTES.to_vec())
    }
}

impl EventRouter {
    pub fn with_routes(routes: Vec<(RelevantEventType, PlanFn)>) -> Self {
        Self { routes }
    }

    pub fn plan(&self, kind: RelevantEventType, event: &StripeEvent) -> AppResult<DispatchPlan> {
        let handler = self
            .routes
            .iter()
            .find(|(route_kind, _)| *route_kind == kind)
            .map(|(_, handler)| *handler)
            .ok_or_else(|| AppError::UnhandledEvent(kind.to_string()))?;

        handler(event)
    }
}

// ============================================================================
// Use Cases
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    Processed(RelevantEventType),
    Ignored,
}

pub struct WebhookUseCases {
    verifier: Arc<dyn WebhookEventVerifier>,
    mutator: Arc<dyn BillingMutator>,
    email_sender: Arc<dyn EmailSender>,
    router: EventRouter,
    webhook_secret: SecretString,
    email_from: String,
    app_origin: String,
}

impl WebhookUseCases {
    pub fn new(
        verifier: Arc<dyn WebhookEventVerifier>,
        mutator: Arc<dyn BillingMutator>,
        email_sender: Arc<dyn EmailSender>,
        webhook_secret: SecretString,
        email_from: String,
        app_origin: String,
    ) -> Self {
        Self {
            verifier,
            mutator,
            email_sender,
            router: EventRouter::default(),
            webhook_secret,
            email_from,
            app_origin,
        }
    }

    pub fn with_router(mut self, router: EventRouter) -> Self {
        self.router = router;
        self
    }

    /// Verify, route and apply one webhook delivery.
    ///
    /// Identical redeliveries are applied again; duplicate safety belongs to
    /// the mutator.
    #[instrument(skip(self, payload, signature), fields(event_id, event_type))]
    pub async fn handle(
        &self,
        payload: &str,
        signature: Option<&str>,
    ) -> AppResult<WebhookOutcome> {
        let event = self.verify(payload, signature)?;

        let span = tracing::Span::current();
        span.record("event_id", event.id.as_str());
        span.record("event_type", event.event_type.as_str());

        let Some(kind) = event.relevant_type() else {
            tracing::debug!("Ignoring irrelevant webhook event type");
            return Ok(WebhookOutcome::Ignored);
        };

        let plan = self.router.plan(kind, &event)?;
        self.execute(plan).await?;

        tracing::info!("Webhook event processed");
        Ok(WebhookOutcome::Processed(kind))
    }

    fn verify(&self, payload: &str, signature: Option<&str>) -> AppResult<StripeEvent> {
        let signature = signature
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(VerificationError::MissingSignature)?;

        let secret = self.webhook_secret.expose_secret();
        if secret.is_empty() {
            return Err(VerificationError::MissingSecret.into());
        }

        self.verifier
            .construct_event(payload, signature, secret)
            .map_err(|e| {
                tracing::warn!(error = %e, "Webhook signature verification failed");
                AppError::from(e)
            })
    }

    async fn execute(&self, plan: DispatchPlan) -> AppResult<()> {
        for action in plan.actions {
            self.apply(action).await?;
        }

        match plan.rejection {
            Some(rejection) => Err(rejection),
            None => Ok(()),
        }
    }

    async fn apply(&self, action: WebhookAction) -> AppResult<()> {
        match action {
            WebhookAction::UpsertProduct(product) => self.mutator.upsert_product(&product).await,
            WebhookAction::UpsertPrice(price) => self.mutator.upsert_price(&price).await,
            WebhookAction::UpsertSubscription(request) => {
                self.mutator.upsert_user_subscription(&request).await
            }
            WebhookAction::RecordPayment { payment_intent_id } => {
                tracing::info!(
                    payment_intent_id = payment_intent_id.as_deref().unwrap_or("none"),
                    "One-time payment succeeded"
                );
                Ok(())
            }
            WebhookAction::SendPaymentEmail { to, kind } => {
                self.send_payment_email(to, kind).await
            }
        }
    }

    async fn send_payment_email(&self, to: String, kind: PaymentEmailKind) -> AppResult<()> {
        let (subject, html) = payment_success_email(&self.app_origin, kind);
        let email = OutgoingEmail {
            from: self.email_from.clone(),
            to,
            subject,
            html,
        };

        match self.email_sender.send(&email).await {
            Ok(receipt) => {
                tracing::info!(email_id = %receipt.id, ?kind, "Payment email sent");
                Ok(())
            }
            Err(err @ AppError::EmailDelivery(_)) => Err(err),
            Err(other) => Err(AppError::EmailDelivery(other.to_string())),
        }
    }
}
