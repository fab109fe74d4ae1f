//! Admin API 路由配置

use actix_web::web;

use super::auth::{
    login, login_rate_limiter, refresh_rate_limiter, refresh_token, verify_token,
};
use super::link_ops::{get_links, post_link, post_links_status};
use super::metrics_ops::get_metrics;

/// 链接管理路由 `/links`
///
/// 包含：
/// - GET /links - 列出链接
/// - POST /links - 创建链接
/// - POST /links/status - 批量查询状态
pub fn links_routes() -> actix_web::Scope {
    web::scope("/links")
        .route("", web::get().to(get_links))
        .route("", web::post().to(post_link))
        .route("/status", web::post().to(post_links_status))
}

/// 指标路由 `/metrics`
pub fn metrics_routes() -> actix_web::Scope {
    web::scope("/metrics").route("", web::get().to(get_metrics))
}

/// 认证路由 `/auth`
///
/// 包含：
/// - POST /auth/login - 登录（带限流）
/// - POST /auth/refresh - 刷新 token（带限流）
/// - GET /auth/verify - 验证 token
pub fn auth_routes() -> actix_web::Scope {
    web::scope("/auth")
        .route("/login", web::post().to(login).wrap(login_rate_limiter()))
        .route(
            "/refresh",
            web::post().to(refresh_token).wrap(refresh_rate_limiter()),
        )
        .route("/verify", web::get().to(verify_token))
}

/// Admin API v1 路由
pub fn admin_v1_routes() -> actix_web::Scope {
    web::scope("/v1")
        .service(links_routes())
        .service(metrics_routes())
        .service(auth_routes())
}
