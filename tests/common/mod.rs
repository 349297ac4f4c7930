use std::sync::Arc;

use axum::Router;
use tokio::task::JoinHandle;

use intouch_gateway::{
    api::create_router,
    config::{
        Config, CredentialSet, DatabaseConfig, IntouchConfig, Mode, SenderIdentity, ServerConfig,
        SettlementConfig, StatusConfig,
    },
    db::{InMemoryPaymentStore, SharedPaymentStore},
    services::hooks::HookRegistry,
    services::intouch::IntouchService,
    services::settlement::{spawn_worker, SettlementContext},
    AppState,
};

/// Provider configuration pointing every endpoint at the given mock server.
pub fn intouch_config(provider_url: &str) -> IntouchConfig {
    IntouchConfig {
        mode: Mode::Test,
        base_url_test: provider_url.to_string(),
        base_url_live: "https://live.invalid".to_string(),
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
            base_url: provider_url.to_string(),
            agency_code: "NKWEK10292".to_string(),
            authorization: "Basic dGVzdDp0ZXN0".to_string(),
            partner_id: "PAW0000".to_string(),
            login_api: "api_login".to_string(),
            password_api: "api_password".to_string(),
        },
    }
}

/// Tight timing budget so tests do not sit in real wait windows.
pub fn settlement_config() -> SettlementConfig {
    SettlementConfig {
        initial_delay_secs: 0,
        max_attempts: 3,
        retry_delay_secs: 0,
        max_retry_delay_secs: 1,
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: InMemoryPaymentStore,
    pub worker: JoinHandle<()>,
}

/// Assembles the full application against an in-memory store and the given
/// mock provider, settlement worker included.
pub fn spawn_app(provider_url: &str) -> TestApp {
    spawn_app_with(intouch_config(provider_url))
}

/// Like [`spawn_app`], for tests that need the initiation and status hosts
/// to point at different places.
pub fn spawn_app_with(intouch: IntouchConfig) -> TestApp {
    let config = Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "postgres://unused.invalid/test".to_string(),
            max_connections: 1,
        },
        intouch,
        settlement: settlement_config(),
    };

    let store = InMemoryPaymentStore::new();
    let shared_store: SharedPaymentStore = Arc::new(store.clone());
    let intouch = Arc::new(IntouchService::new(&config.intouch).expect("client builds"));
    let hooks = Arc::new(HookRegistry::new());

    let (settlement, worker) = spawn_worker(Arc::new(SettlementContext {
        store: shared_store.clone(),
        intouch: intouch.clone(),
        hooks: hooks.clone(),
        config: config.settlement.clone(),
    }));

    let state = AppState::new(Arc::new(config), shared_store, intouch, hooks, settlement);

    TestApp {
        router: create_router(state),
        store,
        worker,
    }
}
