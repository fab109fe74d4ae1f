//! HTTP 接口层
//!
//! - `services::admin`：运维管理 API（JWT Bearer 认证）
//! - `services::public`：答卷者使用的公开 API（token 即凭证）
//! - `services::health`：健康检查

pub mod constants;
pub mod jwt;
pub mod middleware;
pub mod services;
mod state;

pub use state::AppState;
