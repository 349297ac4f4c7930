use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::store::PaymentStore;
use crate::error::AppResult;
use crate::models::PaymentRequest;

/// A thread-safe in-memory payment store.
///
/// Implements the same interface as the Postgres store so handlers and the
/// settlement worker can run against it in tests or local experiments.
#[derive(Default, Clone)]
pub struct InMemoryPaymentStore {
    payments: Arc<RwLock<HashMap<Uuid, PaymentRequest>>>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a record. Creation is the surrounding application's job in
    /// production, which is why this is not part of the store trait.
    pub async fn insert(&self, payment: PaymentRequest) {
        let mut payments = self.payments.write().await;
        payments.insert(payment.id, payment);
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<PaymentRequest>> {
        let payments = self.payments.read().await;
        Ok(payments.get(&id).cloned())
    }

    async fn find_unpaid_by_id(&self, id: Uuid) -> AppResult<Option<PaymentRequest>> {
        let payments = self.payments.read().await;
        Ok(payments.get(&id).filter(|p| !p.is_paid).cloned())
    }

    async fn mark_paid(
        &self,
        id: Uuid,
        payment_method: &str,
        transaction_id: Option<&str>,
    ) -> AppResult<Option<PaymentRequest>> {
        let mut payments = self.payments.write().await;
        Ok(payments.get_mut(&id).map(|payment| {
            payment.payment_method = Some(payment_method.to_string());
            payment.is_paid = true;
            payment.transaction_id = transaction_id.map(str::to_string);
            payment.updated_at = Utc::now();
            payment.clone()
        }))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
