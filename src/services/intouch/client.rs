use reqwest::Client;

use crate::config::{CredentialSet, IntouchConfig, SenderIdentity, StatusConfig};
use crate::error::AppResult;

/// HTTP client for the Intouch/Orange Money API.
///
/// The initiation host and agency credentials are resolved once from the
/// mode-selected configuration; the status endpoint keeps its own partner
/// credential set.
#[derive(Clone)]
pub struct IntouchClient {
    pub(super) http: Client,
    pub(super) base_url: String,
    pub(super) credentials: CredentialSet,
    pub(super) service_code: String,
    pub(super) callback_url: String,
    pub(super) sender: SenderIdentity,
    pub(super) status: StatusConfig,
}

impl IntouchClient {
    pub fn new(config: &IntouchConfig) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
            credentials: config.active_values().clone(),
            service_code: config.service_code.clone(),
            callback_url: config.callback_url.clone(),
            sender: config.sender.clone(),
            status: config.status.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Transaction-initiation endpoint. The provider expects the agent
    /// credentials both in the query string and as basic auth.
    pub fn transaction_url(&self) -> String {
        format!(
            "{}/touchpayapi/{}/transaction?loginAgent={}&passwordAgent={}",
            self.base_url,
            self.credentials.agency_code,
            self.credentials.login_agent,
            self.credentials.password_agent
        )
    }

    pub fn status_url(&self) -> String {
        format!(
            "{}/{}/check_status",
            self.status.base_url, self.status.agency_code
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Mode, SANDBOX_BASE_URL, LIVE_BASE_URL};

    fn intouch_config(mode: Mode) -> IntouchConfig {
        IntouchConfig {
            mode,
            base_url_test: SANDBOX_BASE_URL.to_string(),
            base_url_live: LIVE_BASE_URL.to_string(),
            test_values: CredentialSet {
                agency_code: "AG_TEST".to_string(),
                login_agent: "agent_t".to_string(),
                password_agent: "secret_t".to_string(),
            },
            live_values: CredentialSet {
                agency_code: "AG_LIVE".to_string(),
                login_agent: "agent_l".to_string(),
                password_agent: "secret_l".to_string(),
            },
            service_code: "CM_PAIEMENTMARCHAND_OM_TP".to_string(),
            callback_url: "http://localhost:8080/payment/intouch/callback".to_string(),
            sender: SenderIdentity {
                email: "payments@merchant.example".to_string(),
                first_name: "Payment".to_string(),
                last_name: "Gateway".to_string(),
            },
            status: StatusConfig {
                base_url: LIVE_BASE_URL.to_string(),
                agency_code: "NKWEK10292".to_string(),
                authorization: "Basic dG9rZW4=".to_string(),
                partner_id: "PAW0000".to_string(),
                login_api: "api_login".to_string(),
                password_api: "api_password".to_string(),
            },
        }
    }

    #[test]
    fn test_mode_targets_sandbox_with_test_credentials() {
        let client = IntouchClient::new(&intouch_config(Mode::Test)).unwrap();
        let url = client.transaction_url();
        assert!(url.starts_with(SANDBOX_BASE_URL));
        assert!(url.contains("/touchpayapi/AG_TEST/transaction"));
        assert!(url.contains("loginAgent=agent_t"));
        assert!(url.contains("passwordAgent=secret_t"));
    }

    #[test]
    fn live_mode_targets_production_with_live_credentials() {
        let client = IntouchClient::new(&intouch_config(Mode::Live)).unwrap();
        let url = client.transaction_url();
        assert!(url.starts_with(LIVE_BASE_URL));
        assert!(url.contains("/touchpayapi/AG_LIVE/transaction"));
        assert!(url.contains("loginAgent=agent_l"));
    }

    #[test]
    fn status_url_is_mode_independent() {
        let test_client = IntouchClient::new(&intouch_config(Mode::Test)).unwrap();
        let live_client = IntouchClient::new(&intouch_config(Mode::Live)).unwrap();
        let expected = format!("{}/NKWEK10292/check_status", LIVE_BASE_URL);
        assert_eq!(test_client.status_url(), expected);
        assert_eq!(live_client.status_url(), expected);
    }
}
