use std::str::FromStr;
use std::time::Duration;

use sea_orm::sqlx::SqlitePool;
use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, SqlxSqliteConnector};
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::errors::{Result, SurveyError};
use migration::{Migrator, MigratorTrait};

/// 并发提交争用写锁时的等待上限
const SQLITE_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// 打开 SQLite 数据库
///
/// - foreign_keys：survey_responses.link_id 引用 survey_links.id，SQLite 默认不检查
/// - WAL + busy_timeout：读不阻塞写，同一链接的并发提交排队而不是直接 SQLITE_BUSY
pub async fn connect_sqlite(database_url: &str) -> Result<DatabaseConnection> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| SurveyError::database_config(format!("SQLite URL 解析失败: {}", e)))?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(SQLITE_BUSY_TIMEOUT);

    let pool = SqlitePool::connect_with(options).await.map_err(|e| {
        SurveyError::database_connection(format!("无法连接到 SQLite 数据库: {}", e))
    })?;

    debug!("SQLite pool opened: {}", database_url);
    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

/// 打开 MySQL/PostgreSQL 连接池
pub async fn connect_generic(
    database_url: &str,
    backend_name: &str,
    config: &DatabaseConfig,
) -> Result<DatabaseConnection> {
    let timeout = Duration::from_secs(config.timeout);

    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .max_connections(config.pool_size)
        .connect_timeout(timeout)
        .acquire_timeout(timeout)
        .sqlx_logging(false);

    Database::connect(options).await.map_err(|e| {
        SurveyError::database_connection(format!(
            "无法连接到 {} 数据库: {}",
            backend_name.to_uppercase(),
            e
        ))
    })
}

/// 建表及索引（幂等）
pub async fn run_migrations(db: &DatabaseConnection) -> Result<()> {
    Migrator::up(db, None)
        .await
        .map_err(|e| SurveyError::database_operation(format!("迁移失败: {}", e)))?;

    info!("Database migrations completed");
    Ok(())
}
