use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A purchase awaiting collection through the gateway.
///
/// Records are created by the surrounding application before the payer is
/// sent to the payment page; this service only reads them and marks them
/// paid once the provider reports a successful settlement.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PaymentRequest {
    pub id: Uuid,
    pub payment_amount: i64,
    pub currency_code: String,
    pub payment_method: Option<String>,
    pub is_paid: bool,
    pub transaction_id: Option<String>,
    pub success_hook: Option<String>,
    pub failure_hook: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PaymentRequest {
    /// Builds an unpaid record with the given id and amount. The hooks and
    /// method stay unset until settlement.
    pub fn new(id: Uuid, payment_amount: i64) -> Self {
        let now = Utc::now();
        Self {
            id,
            payment_amount,
            currency_code: "XAF".to_string(),
            payment_method: None,
            is_paid: false,
            transaction_id: None,
            success_hook: None,
            failure_hook: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_hooks(
        mut self,
        success_hook: Option<&str>,
        failure_hook: Option<&str>,
    ) -> Self {
        self.success_hook = success_hook.map(str::to_string);
        self.failure_hook = failure_hook.map(str::to_string);
        self
    }
}

/// Caller-facing projection of a payment record. Hook names are internal
/// routing details and never leave the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentView {
    pub id: Uuid,
    pub payment_amount: i64,
    pub currency_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    pub is_paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PaymentRequest> for PaymentView {
    fn from(payment: PaymentRequest) -> Self {
        Self {
            id: payment.id,
            payment_amount: payment.payment_amount,
            currency_code: payment.currency_code,
            payment_method: payment.payment_method,
            is_paid: payment.is_paid,
            transaction_id: payment.transaction_id,
            created_at: payment.created_at,
        }
    }
}
