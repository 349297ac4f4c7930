pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

use std::sync::Arc;

use config::Config;
use db::SharedPaymentStore;
use services::hooks::HookRegistry;
use services::intouch::IntouchService;
use services::settlement::SettlementQueue;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: SharedPaymentStore,
    pub intouch: Arc<IntouchService>,
    pub hooks: Arc<HookRegistry>,
    pub settlement: SettlementQueue,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        store: SharedPaymentStore,
        intouch: Arc<IntouchService>,
        hooks: Arc<HookRegistry>,
        settlement: SettlementQueue,
    ) -> Self {
        Self {
            config,
            store,
            intouch,
            hooks,
            settlement,
        }
    }
}
