use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::PaymentView;
use crate::AppState;

/// View path handed to the frontend for collecting the payer's number.
const COLLECT_VIEW: &str = "payment/intouch/collect";

#[derive(Debug, Deserialize)]
pub struct PaymentPageParams {
    pub payment_id: Option<String>,
}

/// Parses the caller-supplied payment id, reporting missing or malformed
/// values as a structured validation failure.
pub(super) fn parse_payment_id(raw: Option<&str>) -> AppResult<Uuid> {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return Err(AppError::Validation {
            message: "Invalid request".to_string(),
            details: Some(json!({ "payment_id": ["payment_id is required"] })),
        });
    };

    Uuid::parse_str(raw).map_err(|_| AppError::Validation {
        message: "Invalid request".to_string(),
        details: Some(json!({ "payment_id": ["payment_id must be a valid UUID"] })),
    })
}

/// Body returned when there is no unpaid record to act on. Deliberately a
/// 200, not a 404: an already-settled or unknown id is a no-op, not an
/// error, so repeated page loads and provider callbacks stay harmless.
pub(super) fn no_pending_payment() -> serde_json::Value {
    json!({
        "success": true,
        "code": "NO_PENDING_PAYMENT",
        "message": "No pending payment for this id"
    })
}

/// `GET /payment/intouch?payment_id=<uuid>`
///
/// Looks up the unpaid record and returns the render descriptor for the
/// collection view. No side effects beyond the lookup.
pub async fn payment_page(
    State(state): State<AppState>,
    Query(params): Query<PaymentPageParams>,
) -> AppResult<Json<serde_json::Value>> {
    let payment_id = parse_payment_id(params.payment_id.as_deref())?;

    let Some(payment) = state.store.find_unpaid_by_id(payment_id).await? else {
        tracing::debug!(payment_id = %payment_id, "No unpaid payment to render");
        return Ok(Json(no_pending_payment()));
    };

    Ok(Json(json!({
        "success": true,
        "view": COLLECT_VIEW,
        "payment": PaymentView::from(payment),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_payment_id_is_a_validation_error() {
        let err = parse_payment_id(None).unwrap_err();
        match err {
            AppError::Validation { details, .. } => {
                let details = details.expect("per-field details");
                assert!(details["payment_id"][0]
                    .as_str()
                    .unwrap()
                    .contains("required"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn malformed_payment_id_is_a_validation_error() {
        assert!(parse_payment_id(Some("not-a-uuid")).is_err());
        assert!(parse_payment_id(Some("")).is_err());
    }

    #[test]
    fn well_formed_payment_id_parses() {
        let id = Uuid::new_v4();
        assert_eq!(parse_payment_id(Some(&id.to_string())).unwrap(), id);
    }
}
