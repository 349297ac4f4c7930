use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::PaymentRequest;

/// Storage operations the gateway depends on.
///
/// Payment records are created and deleted by the surrounding application;
/// this service only looks them up and marks them paid, so the interface is
/// deliberately narrow: a by-id lookup, an unpaid-by-id lookup and the
/// settlement update. `ping` exists for health reporting only.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<PaymentRequest>>;

    /// Lookup used by the payment page: the record must exist and still be
    /// unpaid, otherwise there is nothing to collect.
    async fn find_unpaid_by_id(&self, id: Uuid) -> AppResult<Option<PaymentRequest>>;

    /// Partial update applied on settlement. Returns the updated record, or
    /// `None` when the id no longer matches anything. The provider does not
    /// always report a transaction id; an absent one is stored as NULL.
    async fn mark_paid(
        &self,
        id: Uuid,
        payment_method: &str,
        transaction_id: Option<&str>,
    ) -> AppResult<Option<PaymentRequest>>;

    async fn ping(&self) -> AppResult<()>;
}

pub type SharedPaymentStore = Arc<dyn PaymentStore>;
