use std::time::Duration;

use actix_web::dev::ServerHandle;
use sea_orm::DatabaseConnection;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::system::signal::wait_for_shutdown_signal;

/// 关闭超时时间（秒）
const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// 等待关闭信号，然后优雅停止 HTTP 服务并关闭数据库连接
pub async fn listen_for_shutdown(handle: ServerHandle, db: DatabaseConnection) {
    wait_for_shutdown_signal().await;
    info!("Shutdown signal received, draining in-flight requests...");

    let shutdown_result = timeout(Duration::from_secs(SHUTDOWN_TIMEOUT_SECS), async {
        handle.stop(true).await;
        if let Err(e) = db.close().await {
            warn!("Failed to close database connection cleanly: {}", e);
        }
    })
    .await;

    match shutdown_result {
        Ok(()) => info!("All shutdown tasks completed successfully"),
        Err(_) => error!(
            "Shutdown tasks timed out after {} seconds",
            SHUTDOWN_TIMEOUT_SECS
        ),
    }
}
