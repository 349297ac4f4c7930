use serde::Serialize;

use super::IntouchClient;
use crate::error::AppResult;
use crate::models::PaymentRequest;

/// Payload of the transaction-initiation call. Field spellings follow the
/// provider's wire format, including `additionnalInfos`.
#[derive(Debug, Clone, Serialize)]
pub struct StartTransactionRequest {
    #[serde(rename = "idFromClient")]
    pub id_from_client: String,
    #[serde(rename = "additionnalInfos")]
    pub additional_infos: AdditionalInfos,
    pub amount: String,
    pub callback: String,
    #[serde(rename = "recipientNumber")]
    pub recipient_number: String,
    #[serde(rename = "serviceCode")]
    pub service_code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdditionalInfos {
    #[serde(rename = "recipientEmail")]
    pub recipient_email: String,
    #[serde(rename = "recipientFirstName")]
    pub recipient_first_name: String,
    #[serde(rename = "recipientLastName")]
    pub recipient_last_name: String,
    pub destinataire: String,
}

impl IntouchClient {
    /// Triggers the provider-side payment towards the payer's mobile number.
    ///
    /// The raw response is handed back for inspection; the provider pushes
    /// the actual outcome later, so nothing is parsed or retried here.
    pub async fn start_transaction(
        &self,
        payment: &PaymentRequest,
        mobile_number: &str,
    ) -> AppResult<reqwest::Response> {
        let request = StartTransactionRequest {
            id_from_client: payment.id.to_string(),
            additional_infos: AdditionalInfos {
                recipient_email: self.sender.email.clone(),
                recipient_first_name: self.sender.first_name.clone(),
                recipient_last_name: self.sender.last_name.clone(),
                destinataire: mobile_number.to_string(),
            },
            amount: payment.payment_amount.to_string(),
            callback: self.callback_url.clone(),
            recipient_number: mobile_number.to_string(),
            service_code: self.service_code.clone(),
        };

        let response = self
            .http
            .put(self.transaction_url())
            .basic_auth(
                &self.credentials.login_agent,
                Some(&self.credentials.password_agent),
            )
            .json(&request)
            .send()
            .await?;

        Ok(response)
    }
}
