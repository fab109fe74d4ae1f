//! Server mode
//!
//! This module contains the HTTP server startup logic.

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use tracing::warn;

use crate::api::AppState;
use crate::api::middleware::RequestIdMiddleware;
use crate::api::services::{AppStartTime, configure_routes};
use crate::config::get_config;
use crate::runtime::lifetime;

/// Build CORS middleware
///
/// 公开 API 由嵌入页面跨域调用，允许任意来源但不携带凭证。
fn build_cors_middleware() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::AUTHORIZATION,
            actix_web::http::header::ACCEPT,
        ])
        .expose_headers(vec!["x-request-id"])
        .max_age(3600)
}

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    let config = get_config();
    let startup = lifetime::startup::prepare_server_startup(&config)
        .await
        .map_err(|e| {
            tracing::error!("Server startup failed: {:#}", e);
            e
        })?;

    let state = web::Data::new(AppState::new(
        startup.services.clone(),
        startup.storage.clone(),
        startup.bulk_max_tokens,
    ));
    let credentials = web::Data::from(startup.credentials.clone());
    let start_time = web::Data::new(app_start_time);
    let api_config = config.api.clone();

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let db_for_shutdown = startup.storage.get_db().clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(build_cors_middleware())
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate"))
                    .add(("X-Content-Type-Options", "nosniff")),
            )
            .app_data(state.clone())
            .app_data(credentials.clone())
            .app_data(start_time.clone())
            .configure(|cfg| configure_routes(cfg, &api_config))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count)
    .disable_signals();

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run();

    let handle = server.handle();
    tokio::spawn(lifetime::shutdown::listen_for_shutdown(
        handle,
        db_for_shutdown,
    ));

    server.await?;
    warn!("Server stopped");
    Ok(())
}
