use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::AppResult;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub mode: String,
    pub database: bool,
}

pub async fn health_check(State(state): State<AppState>) -> AppResult<Json<HealthResponse>> {
    let db_status = state
        .store
        .ping()
        .await
        .map(|_| "connected")
        .unwrap_or("disconnected");

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status.to_string(),
    }))
}

pub async fn service_status(State(state): State<AppState>) -> AppResult<Json<StatusResponse>> {
    let db_ok = state.store.ping().await.is_ok();

    Ok(Json(StatusResponse {
        status: if db_ok { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        mode: state.config.intouch.mode.to_string(),
        database: db_ok,
    }))
}
