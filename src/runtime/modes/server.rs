//! Server mode
//!
//! This module contains the HTTP server startup logic.
//! It configures and starts the HTTP server with all necessary routes.

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
};
use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api;
use crate::api::services::AppStartTime;
use crate::config::AppConfig;
use crate::runtime::lifetime;

/// Run the HTTP server
///
/// This function:
/// 1. Prepares server components (storage, services)
/// 2. Configures and starts the HTTP server
/// 3. Stops gracefully on Ctrl+C and closes the storage
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: AppConfig) -> Result<()> {
    let app_start_time = AppStartTime::now();

    let startup = lifetime::startup::prepare_server_startup(&config)
        .await
        .map_err(|e| {
            tracing::error!("Server startup failed: {}", e);
            e
        })?;

    let services = startup.services;
    let stores = services.stores.clone();
    let routes = config.routes.clone();

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting server at http://{}", bind_address);
    info!("API available at: {}", routes.api_prefix);
    info!("Health checks available at: {}", routes.health_prefix);

    let server = HttpServer::new(move || {
        let services = services.clone();
        let routes = routes.clone();
        let start_time = app_start_time.clone();

        App::new()
            .wrap(Compress::default())
            .wrap(DefaultHeaders::new().add(("X-Content-Type-Options", "nosniff")))
            .configure(move |cfg| api::configure(cfg, services, routes, start_time))
    })
    .workers(cpu_count)
    .disable_signals()
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    let handle = server.handle();
    tokio::spawn(async move {
        lifetime::shutdown::wait_for_signal().await;
        handle.stop(true).await;
    });

    server.await.context("HTTP server error")?;

    lifetime::shutdown::perform_shutdown_tasks(&stores).await;
    Ok(())
}
