pub mod admin;
pub mod health;
pub mod public;

use actix_web::web;

pub use admin::json_error_handler;
pub use admin::routes::admin_v1_routes;
pub use health::{AppStartTime, HealthService, health_routes};
pub use public::{PublicService, public_v1_routes};

use crate::api::constants::MAX_JSON_PAYLOAD_BYTES;
use crate::api::middleware::AdminAuth;
use crate::config::ApiConfig;

/// 注册全部路由
///
/// scope 注册顺序：health → admin → public。JSON 解析配置也在这里注册。
/// 调用方需要提供 `web::Data<AppState>`、`web::Data<AdminCredentials>`、`web::Data<AppStartTime>`。
pub fn configure_routes(cfg: &mut web::ServiceConfig, api: &ApiConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(MAX_JSON_PAYLOAD_BYTES)
            .error_handler(json_error_handler),
    );

    cfg.service(web::scope(&api.health_prefix).service(health_routes()))
        .service(
            web::scope(&api.admin_prefix)
                .wrap(AdminAuth::new(api.admin_prefix.clone()))
                .service(admin_v1_routes()),
        )
        .service(web::scope(&api.public_prefix).service(public_v1_routes()));
}
