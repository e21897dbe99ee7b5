use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use std::time::{Duration, Instant};
use tracing::{error, trace};

use super::error_code::ErrorCode;
use super::helpers::json_response;
use super::types::{HealthResponse, HealthStorageCheck};
use crate::services::AppServices;

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

impl AppStartTime {
    pub fn now() -> Self {
        Self {
            start_datetime: chrono::Utc::now(),
        }
    }
}

/// Health Service
///
/// 直接 ping 存储，不走业务服务。
pub struct HealthService;

impl HealthService {
    /// 就绪检查：存储可用才返回 200
    pub async fn readiness_check(
        services: web::Data<AppServices>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received readiness check request");

        let backend = services.stores.backend_name().to_string();
        let storage_status =
            match tokio::time::timeout(Duration::from_secs(5), services.stores.links.ping()).await
            {
                Ok(Ok(())) => HealthStorageCheck {
                    status: "healthy".to_string(),
                    backend,
                    error: None,
                },
                Ok(Err(e)) => {
                    error!("Storage health check failed: {}", e);
                    HealthStorageCheck {
                        status: "unhealthy".to_string(),
                        backend,
                        error: Some("database error".to_string()),
                    }
                }
                Err(_) => {
                    error!("Storage health check timeout");
                    HealthStorageCheck {
                        status: "unhealthy".to_string(),
                        backend,
                        error: Some("timeout".to_string()),
                    }
                }
            };

        let now = chrono::Utc::now();
        let uptime_seconds = (now - app_start_time.start_datetime).num_seconds().max(0) as u64;
        let is_healthy = storage_status.error.is_none();

        let health_data = HealthResponse {
            status: storage_status.status.clone(),
            timestamp: now.to_rfc3339(),
            uptime: uptime_seconds,
            storage: storage_status,
            response_time_ms: start_time.elapsed().as_millis() as u32,
        };

        if is_healthy {
            json_response(
                StatusCode::OK,
                ErrorCode::Success,
                "OK",
                None,
                Some(health_data),
            )
        } else {
            json_response(
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::ServiceUnavailable,
                "Service Unavailable",
                None,
                Some(health_data),
            )
        }
    }

    /// 存活检查：进程能响应即可
    pub async fn liveness_check() -> impl Responder {
        trace!("Received liveness check request");
        HttpResponse::NoContent().finish()
    }
}

pub fn health_routes(prefix: &str) -> actix_web::Scope {
    web::scope(prefix)
        .route("/ready", web::get().to(HealthService::readiness_check))
        .route("/ready", web::head().to(HealthService::readiness_check))
        .route("/live", web::get().to(HealthService::liveness_check))
        .route("/live", web::head().to(HealthService::liveness_check))
}
