use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{Method, header::CONTENT_TYPE},
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{debug, info, trace};

use crate::api::jwt::{AccessClaims, AdminCredentials};
use crate::api::services::admin::{ApiResponse, ErrorCode};

/// Admin authentication middleware
///
/// 保护管理 scope：要求 `Authorization: Bearer <jwt>`，登录和刷新端点除外。
/// 未配置 admin_token 时整个 scope 返回 404。
#[derive(Clone)]
pub struct AdminAuth {
    admin_prefix: String,
}

impl AdminAuth {
    pub fn new(admin_prefix: impl Into<String>) -> Self {
        Self {
            admin_prefix: admin_prefix.into(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdminAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminAuthMiddleware {
            service: Rc::new(service),
            login_path: format!("{}/v1/auth/login", self.admin_prefix),
            refresh_path: format!("{}/v1/auth/refresh", self.admin_prefix),
        }))
    }
}

pub struct AdminAuthMiddleware<S> {
    service: Rc<S>,
    login_path: String,
    refresh_path: String,
}

impl<S, B> AdminAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    /// Handle OPTIONS requests for CORS preflight
    fn handle_options_request(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        req.into_response(
            HttpResponse::NoContent()
                .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
                .finish()
                .map_into_right_body(),
        )
    }

    /// Handle requests when admin token is not configured
    fn handle_disabled(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        debug!("Admin token not configured - returning 404");
        req.into_response(
            HttpResponse::NotFound()
                .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
                .body("Not Found")
                .map_into_right_body(),
        )
    }

    /// Handle unauthorized requests
    fn handle_unauthorized(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        info!("Admin authentication failed - invalid or missing token");
        req.into_response(
            HttpResponse::Unauthorized()
                .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
                .json(ApiResponse::<()> {
                    code: ErrorCode::Unauthorized as i32,
                    message: "Unauthorized: Invalid or missing token".to_string(),
                    data: None,
                })
                .map_into_right_body(),
        )
    }

    /// 从 Authorization header 提取 Bearer token
    fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
        req.headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.trim().to_string())
    }
}

impl<S, B> Service<ServiceRequest> for AdminAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let login_path = self.login_path.clone();
        let refresh_path = self.refresh_path.clone();

        Box::pin(async move {
            let Some(credentials) = req.app_data::<web::Data<AdminCredentials>>().cloned() else {
                return Ok(Self::handle_disabled(req));
            };

            if !credentials.is_enabled() {
                return Ok(Self::handle_disabled(req));
            }

            // Handle CORS preflight requests
            if req.method() == Method::OPTIONS {
                return Ok(Self::handle_options_request(req));
            }

            // 登录端点自行校验口令
            if req.path() == login_path {
                trace!("Login endpoint accessed - bypassing authentication");
                let response = srv.call(req).await?.map_into_left_body();
                return Ok(response);
            }

            // 刷新端点自行校验 refresh token
            if req.path() == refresh_path {
                trace!("Refresh endpoint accessed - bypassing access token check");
                let response = srv.call(req).await?.map_into_left_body();
                return Ok(response);
            }

            let claims: Option<AccessClaims> = Self::extract_bearer_token(&req).and_then(|token| {
                credentials
                    .jwt()
                    .validate_access_token(&token)
                    .map_err(|e| info!("Bearer token validation failed: {}", e))
                    .ok()
            });

            match claims {
                Some(claims) => {
                    trace!("Admin authentication successful via Bearer token");
                    // handler 可通过 extensions 读取 claims
                    req.extensions_mut().insert(claims);
                    let response = srv.call(req).await?.map_into_left_body();
                    Ok(response)
                }
                None => Ok(Self::handle_unauthorized(req)),
            }
        })
    }
}
