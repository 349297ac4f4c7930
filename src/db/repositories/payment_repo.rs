use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::store::PaymentStore;
use crate::error::AppResult;
use crate::models::PaymentRequest;

const PAYMENT_COLUMNS: &str = "id, payment_amount, currency_code, payment_method, is_paid, \
     transaction_id, success_hook, failure_hook, created_at, updated_at";

/// Postgres-backed payment store.
pub struct PgPaymentStore {
    pool: PgPool,
}

impl PgPaymentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentStore for PgPaymentStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<PaymentRequest>> {
        let payment = sqlx::query_as::<_, PaymentRequest>(&format!(
            "SELECT {} FROM payment_requests WHERE id = $1",
            PAYMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }

    async fn find_unpaid_by_id(&self, id: Uuid) -> AppResult<Option<PaymentRequest>> {
        let payment = sqlx::query_as::<_, PaymentRequest>(&format!(
            "SELECT {} FROM payment_requests WHERE id = $1 AND is_paid = FALSE",
            PAYMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }

    async fn mark_paid(
        &self,
        id: Uuid,
        payment_method: &str,
        transaction_id: Option<&str>,
    ) -> AppResult<Option<PaymentRequest>> {
        let payment = sqlx::query_as::<_, PaymentRequest>(&format!(
            "UPDATE payment_requests \
             SET payment_method = $2, is_paid = TRUE, transaction_id = $3, updated_at = $4 \
             WHERE id = $1 \
             RETURNING {}",
            PAYMENT_COLUMNS
        ))
        .bind(id)
        .bind(payment_method)
        .bind(transaction_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
