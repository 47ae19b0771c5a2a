use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_from_env;
use configs::AppConfig;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;
use crate::state::AppState;
use service::decisions::{repo::SeaOrmDecisionStore, DecisionService};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Public entry: load config (file or env), then build the app and serve it
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();
    let cfg = AppConfig::load_or_env()?;
    run_with_config(cfg).await
}

/// Router over a SeaORM-backed decision store
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    let store = Arc::new(SeaOrmDecisionStore::new(db));
    let decisions = Arc::new(DecisionService::from_store(store));
    let state = AppState::new(decisions, cfg.server.request_timeout());
    Ok(routes::build_router(state, build_cors()))
}

/// Serve until ctrl-c, then drain in-flight requests
pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    init_logging_from_env();
    let app = build_app(&cfg).await?;

    let addr: SocketAddr = cfg.server.bind_addr().parse()?;
    info!(%addr, timeout_ms = cfg.server.request_timeout_ms, "starting explore service");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("explore service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
