use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::api::jwt::AdminCredentials;
use crate::config::{StaticConfig, SurveySettings};
use crate::services::SurveyServices;
use crate::storage::{SeaOrmStorage, StorageFactory};

pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub services: SurveyServices,
    pub credentials: Arc<AdminCredentials>,
    pub bulk_max_tokens: usize,
}

/// 安装 rustls 加密后端（MySQL/PostgreSQL TLS 连接需要）
///
/// 重复安装视为成功。
pub fn install_crypto_provider() {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }
}

/// 准备服务器启动的上下文
/// 包括配置校验、存储和核心服务
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    install_crypto_provider();

    let settings =
        SurveySettings::from_static(config).context("Invalid survey configuration")?;

    let storage = StorageFactory::create()
        .await
        .context("Failed to initialize storage")?;
    info!("Using storage backend: {}", storage.backend_name());

    let services = SurveyServices::new(storage.clone(), &settings);

    let credentials = Arc::new(AdminCredentials::from_config(&config.api));
    if credentials.is_enabled() {
        info!("Admin API available at: {}/v1", config.api.admin_prefix);
    } else {
        warn!("Admin API is disabled (api.admin_token not set)");
    }
    info!("Public API available at: {}/v1/responses", config.api.public_prefix);

    info!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext {
        storage,
        services,
        credentials,
        bulk_max_tokens: config.survey.bulk_max_tokens,
    })
}
