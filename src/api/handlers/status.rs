use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::error::AppResult;
use crate::AppState;

/// `GET /payment/intouch/status/:payment_id`
///
/// Relays the provider's settlement status for an existing payment. The
/// not-found body is a bare `{"error": ...}` object rather than the usual
/// error envelope; existing consumers depend on that shape, so it stays.
pub async fn payment_status(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
) -> AppResult<Response> {
    if state.store.find_by_id(payment_id).await?.is_none() {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Payment not found" })),
        )
            .into_response());
    }

    let status = state.intouch.client().check_status(payment_id).await?;

    Ok(Json(status).into_response())
}
