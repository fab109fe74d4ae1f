use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{error, info, trace};

use crate::api::AppState;
use crate::api::services::admin::{ApiResponse, ErrorCode};
use crate::storage::LinkFilter;
use crate::utils::TimeParser;

/// 存储检查超时
const STORAGE_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize, Debug)]
pub struct HealthStorageCheck {
    pub status: String,
    pub backend: String,
    pub links_count: Option<u64>,
    pub responses_count: Option<u64>,
    pub error: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime: u64,
    pub uptime_human: String,
    pub storage: HealthStorageCheck,
    pub response_time_ms: u64,
}

/// Health Service
///
/// 直接调用 storage，不经过业务服务层。
pub struct HealthService;

impl HealthService {
    async fn check_storage(state: &AppState) -> HealthStorageCheck {
        let backend = state.storage.backend_name().to_string();
        let counts = async {
            let links = state.storage.count_links(&LinkFilter::default()).await?;
            let responses = state.storage.count_responses().await?;
            Ok::<_, crate::errors::SurveyError>((links, responses))
        };

        match tokio::time::timeout(STORAGE_CHECK_TIMEOUT, counts).await {
            Ok(Ok((links, responses))) => {
                trace!("Storage health check passed, {} links found", links);
                HealthStorageCheck {
                    status: "healthy".to_string(),
                    backend,
                    links_count: Some(links),
                    responses_count: Some(responses),
                    error: None,
                }
            }
            Ok(Err(e)) => {
                error!("Storage health check failed: {}", e);
                HealthStorageCheck {
                    status: "unhealthy".to_string(),
                    backend,
                    links_count: None,
                    responses_count: None,
                    error: Some("database error".to_string()),
                }
            }
            Err(_) => {
                error!("Storage health check timeout");
                HealthStorageCheck {
                    status: "unhealthy".to_string(),
                    backend,
                    links_count: None,
                    responses_count: None,
                    error: Some("timeout".to_string()),
                }
            }
        }
    }

    pub async fn health_check(
        state: web::Data<AppState>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        let storage = Self::check_storage(&state).await;
        let is_healthy = storage.status == "healthy";

        let now = chrono::Utc::now();
        let uptime_human = TimeParser::format_duration_human(app_start_time.start_datetime, now);
        let uptime = (now - app_start_time.start_datetime).num_seconds().max(0) as u64;

        let health_data = HealthResponse {
            status: if is_healthy { "healthy" } else { "unhealthy" }.to_string(),
            timestamp: now.to_rfc3339(),
            uptime,
            uptime_human: uptime_human.clone(),
            storage,
            response_time_ms: start_time.elapsed().as_millis() as u64,
        };

        let (status, code, message) = if is_healthy {
            (actix_web::http::StatusCode::OK, ErrorCode::Success, "OK")
        } else {
            (
                actix_web::http::StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::ServiceUnavailable,
                "Service Unavailable",
            )
        };

        info!(
            "Health check completed in {:?}, status: {}, uptime: {}",
            start_time.elapsed(),
            health_data.status,
            uptime_human
        );

        HttpResponse::build(status)
            .append_header(("Content-Type", "application/json; charset=utf-8"))
            .json(ApiResponse {
                code: code as i32,
                message: message.to_string(),
                data: Some(health_data),
            })
    }

    // 就绪检查：数据库可用才返回 200
    pub async fn readiness_check(state: web::Data<AppState>) -> impl Responder {
        trace!("Received readiness check request");

        match tokio::time::timeout(STORAGE_CHECK_TIMEOUT, state.storage.ping()).await {
            Ok(Ok(())) => HttpResponse::Ok()
                .append_header(("Content-Type", "text/plain"))
                .body("OK"),
            Ok(Err(e)) => {
                error!("Readiness check failed: {}", e);
                HttpResponse::ServiceUnavailable()
                    .append_header(("Content-Type", "text/plain"))
                    .body("Not Ready")
            }
            Err(_) => {
                error!("Readiness check timeout");
                HttpResponse::ServiceUnavailable()
                    .append_header(("Content-Type", "text/plain"))
                    .body("Not Ready")
            }
        }
    }

    // 活跃性检查
    pub async fn liveness_check() -> impl Responder {
        trace!("Received liveness check request");

        HttpResponse::NoContent().finish()
    }
}

/// Health 路由配置
pub fn health_routes() -> actix_web::Scope {
    web::scope("")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
        .route("/ready", web::get().to(HealthService::readiness_check))
        .route("/ready", web::head().to(HealthService::readiness_check))
        .route("/live", web::get().to(HealthService::liveness_check))
        .route("/live", web::head().to(HealthService::liveness_check))
}
