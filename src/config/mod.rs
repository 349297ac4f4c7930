use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

/// Sandbox host used when the gateway runs in test mode.
pub const SANDBOX_BASE_URL: &str = "https://sandbox.intouch.net/api";
/// Production host used when the gateway runs in live mode.
pub const LIVE_BASE_URL: &str = "https://apidist.gutouch.net/apidist/sec";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub intouch: IntouchConfig,
    pub settlement: SettlementConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Which of the two provider credential sets and hosts is in force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Test,
    Live,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Test => f.write_str("test"),
            Mode::Live => f.write_str("live"),
        }
    }
}

/// Agency credentials for the transaction-initiation endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialSet {
    pub agency_code: String,
    pub login_agent: String,
    pub password_agent: String,
}

impl CredentialSet {
    fn is_complete(&self) -> bool {
        !self.agency_code.is_empty()
            && !self.login_agent.is_empty()
            && !self.password_agent.is_empty()
    }
}

/// Fixed sender identity forwarded in the initiation payload.
#[derive(Debug, Clone, Deserialize)]
pub struct SenderIdentity {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// The status-check endpoint uses its own partner credential set,
/// independent of the agency credentials above.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusConfig {
    pub base_url: String,
    pub agency_code: String,
    pub authorization: String,
    pub partner_id: String,
    pub login_api: String,
    pub password_api: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntouchConfig {
    pub mode: Mode,
    pub base_url_test: String,
    pub base_url_live: String,
    pub test_values: CredentialSet,
    pub live_values: CredentialSet,
    pub service_code: String,
    pub callback_url: String,
    pub sender: SenderIdentity,
    pub status: StatusConfig,
}

impl IntouchConfig {
    /// The credential set selected by the configured mode.
    pub fn active_values(&self) -> &CredentialSet {
        match self.mode {
            Mode::Test => &self.test_values,
            Mode::Live => &self.live_values,
        }
    }

    /// The initiation host selected by the configured mode.
    pub fn base_url(&self) -> &str {
        match self.mode {
            Mode::Test => &self.base_url_test,
            Mode::Live => &self.base_url_live,
        }
    }
}

/// Timing budget for the asynchronous settlement confirmation.
#[derive(Debug, Clone, Deserialize)]
pub struct SettlementConfig {
    pub initial_delay_secs: u64,
    pub max_attempts: u32,
    pub retry_delay_secs: u64,
    pub max_retry_delay_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        // Defaults live in the unwrap_or fallbacks below; the environment
        // separator turns e.g. SETTLEMENT_MAX_ATTEMPTS into the
        // "settlement.max.attempts" key they look up.
        let config = config::Config::builder()
            .add_source(config::Environment::default().separator("_").try_parsing(true))
            .build()?;

        let mode = match config
            .get_string("intouch.mode")
            .unwrap_or_else(|_| "test".to_string())
            .as_str()
        {
            "test" => Mode::Test,
            "live" => Mode::Live,
            other => {
                return Err(config::ConfigError::Message(format!(
                    "invalid intouch mode '{}', expected 'test' or 'live'",
                    other
                )))
            }
        };

        let test_values = CredentialSet {
            agency_code: config.get_string("intouch.test.agency.code").unwrap_or_default(),
            login_agent: config.get_string("intouch.test.login.agent").unwrap_or_default(),
            password_agent: config.get_string("intouch.test.password.agent").unwrap_or_default(),
        };
        let live_values = CredentialSet {
            agency_code: config.get_string("intouch.live.agency.code").unwrap_or_default(),
            login_agent: config.get_string("intouch.live.login.agent").unwrap_or_default(),
            password_agent: config.get_string("intouch.live.password.agent").unwrap_or_default(),
        };

        // Manual construction due to environment variable naming
        let loaded = Config {
            server: ServerConfig {
                host: config.get_string("host").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: config.get_int("port").unwrap_or(8080) as u16,
            },
            database: DatabaseConfig {
                url: config.get_string("database.url")?,
                max_connections: config.get_int("database.max.connections").unwrap_or(10) as u32,
            },
            intouch: IntouchConfig {
                mode,
                base_url_test: config
                    .get_string("intouch.base.url.test")
                    .unwrap_or_else(|_| SANDBOX_BASE_URL.to_string()),
                base_url_live: config
                    .get_string("intouch.base.url.live")
                    .unwrap_or_else(|_| LIVE_BASE_URL.to_string()),
                test_values,
                live_values,
                service_code: config
                    .get_string("intouch.service.code")
                    .unwrap_or_else(|_| "CM_PAIEMENTMARCHAND_OM_TP".to_string()),
                callback_url: config
                    .get_string("intouch.callback.url")
                    .unwrap_or_else(|_| "http://localhost:8080/payment/intouch/callback".to_string()),
                sender: SenderIdentity {
                    email: config
                        .get_string("intouch.sender.email")
                        .unwrap_or_else(|_| "payments@merchant.example".to_string()),
                    first_name: config
                        .get_string("intouch.sender.first.name")
                        .unwrap_or_else(|_| "Payment".to_string()),
                    last_name: config
                        .get_string("intouch.sender.last.name")
                        .unwrap_or_else(|_| "Gateway".to_string()),
                },
                status: StatusConfig {
                    base_url: config
                        .get_string("intouch.status.base.url")
                        .unwrap_or_else(|_| LIVE_BASE_URL.to_string()),
                    agency_code: config
                        .get_string("intouch.status.agency.code")
                        .unwrap_or_else(|_| "NKWEK10292".to_string()),
                    authorization: config.get_string("intouch.status.authorization")?,
                    partner_id: config.get_string("intouch.status.partner.id")?,
                    login_api: config.get_string("intouch.status.login.api")?,
                    password_api: config.get_string("intouch.status.password.api")?,
                },
            },
            settlement: SettlementConfig {
                initial_delay_secs: config.get_int("settlement.initial.delay.secs").unwrap_or(60)
                    as u64,
                max_attempts: config.get_int("settlement.max.attempts").unwrap_or(5) as u32,
                retry_delay_secs: config.get_int("settlement.retry.delay.secs").unwrap_or(5) as u64,
                max_retry_delay_secs: config
                    .get_int("settlement.max.retry.delay.secs")
                    .unwrap_or(60) as u64,
            },
        };

        if !loaded.intouch.active_values().is_complete() {
            return Err(config::ConfigError::Message(format!(
                "intouch {} credentials are incomplete: agency code, login agent and \
                 password agent are all required",
                loaded.intouch.mode
            )));
        }

        Ok(loaded)
    }
}

pub type SharedConfig = Arc<Config>;
