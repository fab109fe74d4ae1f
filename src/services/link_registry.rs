//! Link registry
//!
//! 创建、查询和列出调查链接。链接创建后不可变，不提供删除。

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::SurveySettings;
use crate::errors::{Result, SurveyError};
use crate::storage::{LinkFilter, SeaOrmStorage, SurveyLink};
use crate::token::TokenCodec;

/// campaign_id 最大长度（与表结构一致）
const MAX_CAMPAIGN_LEN: usize = 255;

/// Service for survey link issuance and lookup
pub struct LinkRegistry {
    storage: Arc<SeaOrmStorage>,
    codec: TokenCodec,
    default_ttl: Duration,
}

impl LinkRegistry {
    pub fn new(storage: Arc<SeaOrmStorage>, settings: &SurveySettings) -> Self {
        Self {
            storage,
            codec: TokenCodec::new(&settings.signing_secret),
            default_ttl: settings.default_ttl,
        }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// 创建链接（以当前时间为准）
    pub async fn create(
        &self,
        campaign_id: Option<String>,
        expiry: Option<DateTime<Utc>>,
    ) -> Result<SurveyLink> {
        self.create_at(campaign_id, expiry, Utc::now()).await
    }

    /// 以给定时间创建链接
    ///
    /// `expiry` 为空时使用默认有效期；显式给出的 `expiry` 必须晚于 `now`。
    pub async fn create_at(
        &self,
        campaign_id: Option<String>,
        expiry: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<SurveyLink> {
        let expires_at = match expiry {
            Some(expiry) if expiry <= now => {
                return Err(SurveyError::invalid_expiry(format!(
                    "Expiry {} is not after creation time {}",
                    expiry.to_rfc3339(),
                    now.to_rfc3339()
                )));
            }
            Some(expiry) => expiry,
            None => now
                .checked_add_signed(self.default_ttl)
                .ok_or_else(|| SurveyError::invalid_expiry("Default expiry out of range"))?,
        };

        // 空白 campaign 视为未指定
        let campaign_id = campaign_id
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        if let Some(ref c) = campaign_id
            && c.len() > MAX_CAMPAIGN_LEN
        {
            return Err(SurveyError::validation(format!(
                "campaign_id exceeds {} bytes",
                MAX_CAMPAIGN_LEN
            )));
        }

        let id = Uuid::new_v4();
        let link = SurveyLink {
            id,
            campaign_id,
            token: self.codec.mint(&id)?,
            created_at: now,
            expires_at,
        };

        self.storage.insert_link(&link).await?;

        info!(
            "LinkRegistry: created link {} (campaign={:?}, expires_at={})",
            link.id,
            link.campaign_id,
            link.expires_at.to_rfc3339()
        );
        Ok(link)
    }

    /// 通过 token 查找链接
    ///
    /// 先校验 token，校验失败不会触达存储层。
    pub async fn find_by_token(&self, token: &str) -> Result<SurveyLink> {
        let id = self.codec.verify(token)?;
        self.find_by_id(&id).await
    }

    /// 批量查找，结果只包含存在的链接，顺序不保证
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<SurveyLink>> {
        self.storage.get_links_by_ids(ids).await
    }

    pub async fn find_by_id(&self, id: &Uuid) -> Result<SurveyLink> {
        self.storage
            .get_link(id)
            .await?
            .ok_or_else(|| SurveyError::not_found(format!("Survey link {} not found", id)))
    }

    /// 按过滤条件列出链接（默认 created_at 倒序）
    pub async fn list(&self, filter: &LinkFilter) -> Result<Vec<SurveyLink>> {
        let links = self.storage.list_links(filter).await?;
        debug!("LinkRegistry: listed {} links", links.len());
        Ok(links)
    }

    pub async fn count(&self, filter: &LinkFilter) -> Result<u64> {
        self.storage.count_links(filter).await
    }
}
