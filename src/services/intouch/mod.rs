mod client;
mod status;
mod transactions;

pub use client::IntouchClient;
pub use status::*;
pub use transactions::*;

use std::sync::Arc;

use crate::config::IntouchConfig;
use crate::error::AppResult;

pub struct IntouchService {
    client: IntouchClient,
}

impl IntouchService {
    pub fn new(config: &IntouchConfig) -> AppResult<Self> {
        Ok(Self {
            client: IntouchClient::new(config)?,
        })
    }

    pub fn client(&self) -> &IntouchClient {
        &self.client
    }
}

pub type SharedIntouchService = Arc<IntouchService>;
