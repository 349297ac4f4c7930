use std::net::SocketAddr;
use std::sync::Arc;

use intouch_gateway::{
    api::create_router,
    api::middleware::init_tracing,
    config::Config,
    db::{create_pool, run_migrations, PgPaymentStore},
    services::hooks::{HookRegistry, LogSettlementHook},
    services::intouch::IntouchService,
    services::settlement::{spawn_worker, SettlementContext},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    init_tracing();

    tracing::info!("Starting Intouch Gateway v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::from_env()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    tracing::info!(mode = %config.intouch.mode, "Configuration loaded successfully");

    // Create database connection pool
    let db_pool = create_pool(&config.database).await?;

    // Run migrations
    run_migrations(&db_pool).await?;

    // Initialize provider client
    let intouch = Arc::new(IntouchService::new(&config.intouch)?);

    tracing::info!(base_url = %intouch.client().base_url(), "Intouch client initialized");

    // Payment stores reference hooks by name; register the known handlers here.
    let mut hooks = HookRegistry::new();
    hooks.register("log_settlement", Arc::new(LogSettlementHook));
    let hooks = Arc::new(hooks);

    let store: intouch_gateway::db::SharedPaymentStore =
        Arc::new(PgPaymentStore::new(db_pool));

    // Start the background settlement worker
    let (settlement, worker) = spawn_worker(Arc::new(SettlementContext {
        store: store.clone(),
        intouch: intouch.clone(),
        hooks: hooks.clone(),
        config: config.settlement.clone(),
    }));

    let config = Arc::new(config);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));

    // Create application state and router
    let state = AppState::new(config, store, intouch, hooks, settlement);
    let app = create_router(state);

    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Intouch Gateway is ready to accept connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router held the last queue handle; once it is gone the worker
    // drains its in-flight settlements and exits.
    tracing::info!("Waiting for in-flight settlements to finish...");
    worker.await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
