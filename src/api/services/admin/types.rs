//! Admin API 类型定义

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::storage::{LinkStatus, SortOrder, SurveyLink};

/// 输出目录常量
pub const TS_EXPORT_PATH: &str = "types.generated.ts";

/// 统一响应信封
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct LoginCredentials {
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct AuthSuccessResponse {
    pub access_token: String,
    pub token_type: String,
    /// 有效期（秒）
    pub expires_in: u64,
    pub refresh_token: String,
    pub refresh_expires_in: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct VerifyResponse {
    pub valid: bool,
    pub expires_at: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct PostNewLink {
    pub campaign_id: Option<String>,
    /// RFC3339、YYYY-MM-DD 或相对时间（如 7d）
    pub expiry: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct GetLinksQuery {
    pub campaign: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub order: Option<SortOrder>,
    pub with_status: Option<bool>,
}

/// 链接输出格式（时间统一为 RFC3339 UTC）
#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct LinkResponse {
    pub id: String,
    pub campaign_id: Option<String>,
    pub token: String,
    pub created_at: String,
    /// 与创建请求的 `expiry` 同名
    pub expiry: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LinkStatus>,
}

impl From<SurveyLink> for LinkResponse {
    fn from(link: SurveyLink) -> Self {
        Self {
            id: link.id.to_string(),
            campaign_id: link.campaign_id,
            token: link.token,
            created_at: link.created_at.to_rfc3339(),
            expiry: link.expires_at.to_rfc3339(),
            status: None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct LinkListResponse {
    pub total: usize,
    pub links: Vec<LinkResponse>,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct BulkStatusRequest {
    pub tokens: Vec<String>,
}

/// 批量状态查询中被拒绝 token 的原因
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    InvalidToken,
    NotFound,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct BulkStatusResponse {
    pub statuses: HashMap<String, LinkStatus>,
    pub rejected: HashMap<String, RejectReason>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct MetricsQuery {
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub campaign: Option<String>,
    pub search: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct MessageResponse {
    pub message: String,
}
