use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Connect, migrate, optionally seed, and assemble the router for `cfg`.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    models::db::migrate(&db).await?;

    if cfg.database.seed {
        let seeded = service::seed::seed_demo_data(&db)
            .await
            .map_err(|e| StartupError::Database(e.to_string()))?;
        info!(seeded, "demo data check done");
    }
    if cfg.auth.enforce && cfg.auth.jwt_secret == "dev-secret-change-me" {
        warn!("auth.enforce is on but JWT_SECRET is the development default");
    }

    let state = AppState::new(db, &cfg.api, &cfg.auth);
    Ok(routes::build_router(state, build_cors()))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        return;
    }
    info!("received Ctrl+C, shutting down");
}

/// Public entry: load config, build the app and run the HTTP server until Ctrl+C.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = AppConfig::load_or_env().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    let app = build_app(&cfg).await?;

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e: std::net::AddrParseError| StartupError::InvalidConfig(e.to_string()))?;
    info!(%addr, base_url = %cfg.api.base_url, enforce_auth = cfg.auth.enforce, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}
