//! Admin API 认证相关端点

use actix_governor::{Governor, GovernorConfigBuilder, KeyExtractor, SimpleKeyExtractionError};
use actix_web::dev::ServiceRequest;
use actix_web::http::StatusCode;
use actix_web::{HttpMessage, HttpRequest, Responder, Result as ActixResult, web};
use governor::middleware::NoOpMiddleware;
use tracing::{debug, error, info, warn};

use crate::api::jwt::{AccessClaims, AdminCredentials};

use super::error_code::ErrorCode;
use super::helpers::{error_response, success_response};
use super::types::{AuthSuccessResponse, LoginCredentials, RefreshRequest, VerifyResponse};

/// 基于连接 IP 的限流 key 提取器
///
/// 使用 TCP peer address，不读取可伪造的转发头。
#[derive(Clone, Copy)]
pub struct LoginKeyExtractor;

impl KeyExtractor for LoginKeyExtractor {
    type Key = String;
    type KeyExtractionError = SimpleKeyExtractionError<&'static str>;

    fn extract(&self, req: &ServiceRequest) -> Result<Self::Key, Self::KeyExtractionError> {
        let key = req
            .peer_addr()
            .map(|addr| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        Ok(key)
    }
}

/// 创建登录限流器
///
/// 配置：每秒补充 1 个令牌，突发最多 5 次请求
/// 超限返回 HTTP 429 Too Many Requests
pub fn login_rate_limiter() -> Governor<LoginKeyExtractor, NoOpMiddleware> {
    let config = GovernorConfigBuilder::default()
        .seconds_per_request(1)
        .burst_size(5)
        .key_extractor(LoginKeyExtractor)
        .finish()
        .expect("Invalid rate limit config");

    debug!("Login rate limiter created: 1 req/s, burst 5");
    Governor::new(&config)
}

/// 创建刷新限流器：每秒 1 个令牌，突发 10 次
pub fn refresh_rate_limiter() -> Governor<LoginKeyExtractor, NoOpMiddleware> {
    let config = GovernorConfigBuilder::default()
        .seconds_per_request(1)
        .burst_size(10)
        .key_extractor(LoginKeyExtractor)
        .finish()
        .expect("Invalid rate limit config");

    debug!("Refresh rate limiter created: 1 req/s, burst 10");
    Governor::new(&config)
}

/// 签发一对新的 access/refresh token
fn issue_tokens(
    credentials: &AdminCredentials,
) -> Result<AuthSuccessResponse, jsonwebtoken::errors::Error> {
    let jwt = credentials.jwt();
    Ok(AuthSuccessResponse {
        access_token: jwt.generate_access_token()?,
        token_type: "Bearer".to_string(),
        expires_in: jwt.access_token_minutes() * 60,
        refresh_token: jwt.generate_refresh_token()?,
        refresh_expires_in: jwt.refresh_token_days() * 24 * 3600,
    })
}

/// 登录验证 - 检查管理员口令并签发 access token
pub async fn login(
    credentials: web::Data<AdminCredentials>,
    login_body: web::Json<LoginCredentials>,
) -> ActixResult<impl Responder> {
    if !credentials.check_password(&login_body.password) {
        warn!("Admin API: login failed - invalid password");
        return Ok(error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::AuthFailed,
            "Invalid admin token",
        ));
    }

    match issue_tokens(&credentials) {
        Ok(tokens) => {
            info!("Admin API: login successful");
            Ok(success_response(tokens))
        }
        Err(e) => {
            error!("Admin API: failed to generate tokens: {}", e);
            Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "Failed to generate token",
            ))
        }
    }
}

/// 用 refresh token 换取新的一对 token
///
/// 认证中间件放行此端点，这里自行校验 refresh token。
pub async fn refresh_token(
    credentials: web::Data<AdminCredentials>,
    body: web::Json<RefreshRequest>,
) -> ActixResult<impl Responder> {
    if let Err(e) = credentials.jwt().validate_refresh_token(&body.refresh_token) {
        warn!("Admin API: invalid refresh token: {}", e);
        return Ok(error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::AuthFailed,
            "Invalid refresh token",
        ));
    }

    match issue_tokens(&credentials) {
        Ok(tokens) => {
            info!("Admin API: token refresh successful");
            Ok(success_response(tokens))
        }
        Err(e) => {
            error!("Admin API: failed to generate tokens: {}", e);
            Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "Failed to generate token",
            ))
        }
    }
}

/// 验证 token（认证中间件已完成校验，这里只回显过期时间）
pub async fn verify_token(req: HttpRequest) -> ActixResult<impl Responder> {
    let expires_at = req
        .extensions()
        .get::<AccessClaims>()
        .and_then(AccessClaims::expires_at)
        .map(|dt| dt.to_rfc3339());

    Ok(success_response(VerifyResponse {
        valid: true,
        expires_at,
    }))
}
