use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::IntouchClient;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize)]
pub struct StatusCheckRequest {
    pub partner_id: String,
    pub partner_transaction_id: String,
    pub login_api: String,
    pub password_api: String,
}

/// Settlement status as reported by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCheckResponse {
    pub status: String,
    #[serde(rename = "transactionId", default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

/// Interpretation of the provider's status string.
///
/// Only an explicit `SUCCESSFUL` settles a payment and only an explicit
/// `FAILED` is terminal; everything else (`PENDING`, `INITIATED`, statuses
/// this integration has never seen) is still in flight and worth another
/// poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderStatus {
    Successful,
    Failed,
    Pending,
}

impl StatusCheckResponse {
    pub fn provider_status(&self) -> ProviderStatus {
        match self.status.as_str() {
            "SUCCESSFUL" => ProviderStatus::Successful,
            "FAILED" => ProviderStatus::Failed,
            _ => ProviderStatus::Pending,
        }
    }
}

impl IntouchClient {
    /// Polls the provider for the settlement status of a payment.
    pub async fn check_status(&self, payment_id: Uuid) -> AppResult<StatusCheckResponse> {
        let request = StatusCheckRequest {
            partner_id: self.status.partner_id.clone(),
            partner_transaction_id: payment_id.to_string(),
            login_api: self.status.login_api.clone(),
            password_api: self.status.password_api.clone(),
        };

        let response = self
            .http
            .post(self.status_url())
            .header(AUTHORIZATION, &self.status.authorization)
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                payment_id = %payment_id,
                http_status = %status,
                "Intouch status check rejected: {}",
                body
            );
            return Err(AppError::Provider(format!(
                "status check failed with HTTP {}",
                status
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse Intouch status response: {} - Body: {}", e, body);
            AppError::Provider(format!("unexpected status payload: {}", e))
        })
    }
}
