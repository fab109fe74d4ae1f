//! Admin API 服务模块
//!
//! 该模块包含管理 API 的所有端点：
//! - 认证（登录、token 校验）
//! - 链接创建、列表和批量状态
//! - NPS 指标

pub mod auth;
pub mod error_code;
mod helpers;
mod link_ops;
mod metrics_ops;
pub mod routes;
mod types;

pub use types::*;

pub use helpers::{
    api_result, error_from_survey, error_response, json_error_handler, success_response,
};

pub use error_code::ErrorCode;
