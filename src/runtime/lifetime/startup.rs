use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::services::AppServices;
use crate::storage::StorageFactory;

pub struct StartupContext {
    pub services: AppServices,
}

/// 准备服务器启动的上下文
/// 包括存储连接、迁移和服务装配
pub async fn prepare_server_startup(config: &AppConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    if config.auth.jwt_secret.trim().is_empty() {
        warn!("auth.jwt_secret is empty, sessions cannot be verified");
    }

    let stores = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", stores.backend_name());

    let services = AppServices::build(config, stores).context("Failed to build services")?;

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext { services })
}
