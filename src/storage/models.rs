use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};
use ts_rs::TS;
use uuid::Uuid;

/// 调查链接（创建后不可变、不删除）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyLink {
    pub id: Uuid,
    pub campaign_id: Option<String>,
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SurveyLink {
    /// `now >= expires_at` 即视为过期
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// 调查回复（每个链接至多一条）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyResponse {
    pub link_id: Uuid,
    pub score: u8,
    pub comments: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// 链接生命周期状态（按需推导，不落库）
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    TS,
    EnumIter,
    EnumString,
    AsRefStr,
)]
#[ts(export, export_to = "types.generated.ts")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LinkStatus {
    Active,
    Expired,
    Responded,
}

impl LinkStatus {
    /// 终态：expired / responded 之后不再回到 active
    pub fn is_terminal(self) -> bool {
        !matches!(self, LinkStatus::Active)
    }
}

impl std::fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// 列表排序方向（按 created_at）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "types.generated.ts")]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// 链接过滤条件
#[derive(Default, Clone, Debug)]
pub struct LinkFilter {
    /// campaign_id 子串匹配
    pub campaign: Option<String>,
    /// 创建时间 >= created_after
    pub created_after: Option<DateTime<Utc>>,
    /// 创建时间 <= created_before
    pub created_before: Option<DateTime<Utc>>,
    pub order: SortOrder,
}

/// 回复过滤条件（用于指标汇总）
#[derive(Default, Clone, Debug)]
pub struct ResponseFilter {
    /// 提交时间 >= submitted_after
    pub submitted_after: Option<DateTime<Utc>>,
    /// 提交时间 <= submitted_before
    pub submitted_before: Option<DateTime<Utc>>,
    /// 通过所属链接的 campaign_id 子串匹配
    pub campaign: Option<String>,
    /// comments 全文子串搜索
    pub search: Option<String>,
}
