//! # Quill API Server
//!
//! Actix-web front for the posts storage layer. The storage backend is
//! chosen once at startup and shared by every worker.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::io::Error::other(e)
    })?;

    tracing::info!(
        "Starting Quill API Server on {}:{} ({} storage)",
        config.host,
        config.port,
        config.storage.name()
    );

    let state = AppState::from_config(&config.storage).await.map_err(|e| {
        tracing::error!(error = %e, "Storage backend failed to start");
        std::io::Error::other(e)
    })?;

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
