use std::time::Duration;

use tokio::signal;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::storage::Stores;

/// 关闭超时时间（秒）
const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// 等待 Ctrl+C 信号
pub async fn wait_for_signal() {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received, stopping server...");
        }
        Err(e) => {
            warn!(
                "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
                e
            );
        }
    }
}

/// 服务器停止后释放存储资源
pub async fn perform_shutdown_tasks(stores: &Stores) {
    match timeout(Duration::from_secs(SHUTDOWN_TIMEOUT_SECS), stores.close()).await {
        Ok(()) => {
            info!("Storage closed, shutdown complete");
        }
        Err(_) => {
            error!(
                "Closing storage timed out after {} seconds",
                SHUTDOWN_TIMEOUT_SECS
            );
        }
    }
}
