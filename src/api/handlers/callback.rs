use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use super::payment::{no_pending_payment, parse_payment_id};
use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CallbackRequest {
    /// The provider's own invocations spell this `paymentID`.
    #[serde(alias = "paymentID")]
    pub payment_id: String,
    #[validate(length(min = 8, max = 15, message = "mobile number must be 8 to 15 digits"))]
    pub mobile_number: String,
}

/// `POST /payment/intouch/callback`
///
/// Triggers the provider-side transaction towards the payer's number and
/// queues the settlement confirmation, replying 202 immediately. The
/// settlement outcome is delivered through the record update and the
/// configured hooks, never through this response.
pub async fn payment_callback(
    State(state): State<AppState>,
    Json(body): Json<CallbackRequest>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    body.validate().map_err(|e| AppError::validation_failed(&e))?;
    let payment_id = parse_payment_id(Some(&body.payment_id))?;

    let Some(payment) = state.store.find_unpaid_by_id(payment_id).await? else {
        tracing::debug!(payment_id = %payment_id, "Callback for a settled or unknown payment");
        return Ok((StatusCode::OK, Json(no_pending_payment())));
    };

    let response = state
        .intouch
        .client()
        .start_transaction(&payment, &body.mobile_number)
        .await?;

    // The provider pushes the real outcome later; the initiation response is
    // recorded for diagnosis but never interpreted.
    let http_status = response.status();
    let raw = response.text().await.unwrap_or_default();
    tracing::info!(
        payment_id = %payment_id,
        http_status = %http_status,
        "Intouch transaction initiated: {}",
        raw
    );

    state.settlement.enqueue(payment_id).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "success": true,
            "status": "PENDING",
            "payment_id": payment_id,
        })),
    ))
}
