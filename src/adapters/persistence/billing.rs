use async_trait::async_trait;
use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::billing_sync::{BillingDetails, BillingRepoTrait, SubscriptionRecord},
    domain::entities::{price::StripePrice, product::StripeProduct},
};

#[async_trait]
impl BillingRepoTrait for PostgresPersistence {
    async fn upsert_product(&self, product: &StripeProduct) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO products (id, active, name, description, image, metadata)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                active = EXCLUDED.active,
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                image = EXCLUDED.image,
                metadata = EXCLUDED.metadata
            "#,
        )
        .bind(&product.id)
        .bind(product.active)
        .bind(&product.name)
        .bind(product.description.as_deref())
        .bind(product.image())
        .bind(Json(&product.metadata))
        .execute(self.pool())
        .await
        .map_err(AppError::from)?;

        Ok(())
    }

    async fn upsert_price(&self, price: &StripePrice) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO prices (
                id, product_id, active, currency, description, type, unit_amount,
                interval, interval_count, trial_period_days, metadata
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (id) DO UPDATE SET
                product_id = EXCLUDED.product_id,
                active = EXCLUDED.active,
                currency = EXCLUDED.currency,
                description = EXCLUDED.description,
                type = EXCLUDED.type,
                unit_amount = EXCLUDED.unit_amount,
                interval = EXCLUDED.interval,
                interval_count = EXCLUDED.interval_count,
                trial_period_days = EXCLUDED.trial_period_days,
                metadata = EXCLUDED.metadata
            "#,
        )
        .bind(&price.id)
        .bind(&price.product)
        .bind(price.active)
        .bind(&price.currency)
        .bind(price.nickname.as_deref())
        .bind(price.pricing_type)
        .bind(price.unit_amount)
        .bind(price.interval())
        .bind(price.interval_count())
        .bind(price.trial_period_days())
        .bind(Json(&price.metadata))
        .execute(self.pool())
        .await
        .map_err(AppError::from)?;

        Ok(())
    }

    async fn find_user_id_by_customer(&self, stripe_customer_id: &str) -> AppResult<Option<Uuid>> {
        let user_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM customers WHERE stripe_customer_id = $1",
        )
        .bind(stripe_customer_id)
        .fetch_optional(self.pool())
        .await
        .map_err(AppError::from)?;

        Ok(user_id)
    }

    async fn upsert_subscription(&self, record: &SubscriptionRecord) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO subscriptions (
                id, user_id, status, metadata, price_id, quantity, cancel_at_period_end,
                created, current_period_start, current_period_end, ended_at,
                cancel_at, canceled_at, trial_start, trial_end
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ON CONFLICT (id) DO UPDATE SET
                user_id = EXCLUDED.user_id,
                status = EXCLUDED.status,
                metadata = EXCLUDED.metadata,
                price_id = EXCLUDED.price_id,
                quantity = EXCLUDED.quantity,
                cancel_at_period_end = EXCLUDED.cancel_at_period_end,
                created = EXCLUDED.created,
                current_period_start = EXCLUDED.current_period_start,
                current_period_end = EXCLUDED.current_period_end,
                ended_at = EXCLUDED.ended_at,
                cancel_at = EXCLUDED.cancel_at,
                canceled_at = EXCLUDED.canceled_at,
                trial_start = EXCLUDED.trial_start,
                trial_end = EXCLUDED.trial_end
            "#,
        )
        .bind(&record.id)
        .bind(record.user_id)
        .bind(record.status)
        .bind(Json(&record.metadata))
        .bind(record.price_id.as_deref())
        .bind(record.quantity)
        .bind(record.cancel_at_period_end)
        .bind(record.created)
        .bind(record.current_period_start)
        .bind(record.current_period_end)
        .bind(record.ended_at)
        .bind(record.cancel_at)
        .bind(record.canceled_at)
        .bind(record.trial_start)
        .bind(record.trial_end)
        .execute(self.pool())
        .await
        .map_err(AppError::from)?;

        Ok(())
    }

    async fn update_user_billing_details(
        &self,
        user_id: Uuid,
        details: &BillingDetails,
    ) -> AppResult<()> {
        sqlx::query("UPDATE users SET billing_address = $2, payment_method = $3 WHERE id = $1")
            .bind(user_id)
            .bind(Json(&details.billing_address))
            .bind(Json(&details.payment_method))
            .execute(self.pool())
            .await
            .map_err(AppError::from)?;

        Ok(())
    }
}
