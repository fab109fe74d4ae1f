//! Response ledger
//!
//! 记录调查回复，保证每个链接至多一条回复。

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::{Result, SurveyError};
use crate::storage::{SeaOrmStorage, SurveyResponse};

pub const MIN_SCORE: i64 = 0;
pub const MAX_SCORE: i64 = 10;

/// comments 最大长度（字符）
pub const MAX_COMMENTS_CHARS: usize = 4000;

/// Service owning submitted responses
pub struct ResponseLedger {
    storage: Arc<SeaOrmStorage>,
}

impl ResponseLedger {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// 校验分数范围 [0, 10]
    pub fn validate_score(score: i64) -> Result<u8> {
        if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
            return Err(SurveyError::invalid_score(format!(
                "Score must be within {}..={}, got {}",
                MIN_SCORE, MAX_SCORE, score
            )));
        }
        // 范围已校验
        Ok(score as u8)
    }

    fn normalize_comments(comments: Option<String>) -> Result<Option<String>> {
        let comments = comments
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        if let Some(ref c) = comments
            && c.chars().count() > MAX_COMMENTS_CHARS
        {
            return Err(SurveyError::validation(format!(
                "Comments exceed {} characters",
                MAX_COMMENTS_CHARS
            )));
        }
        Ok(comments)
    }

    pub async fn submit(
        &self,
        link_id: &Uuid,
        score: i64,
        comments: Option<String>,
    ) -> Result<SurveyResponse> {
        self.submit_at(link_id, score, comments, Utc::now()).await
    }

    /// 以给定时间提交回复
    ///
    /// 检查顺序：分数 → 链接存在 → 已有回复 → 过期 → 原子写入。
    /// 最终的唯一性由存储层的唯一索引保证，前置检查只用于给出更准确的错误。
    pub async fn submit_at(
        &self,
        link_id: &Uuid,
        score: i64,
        comments: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<SurveyResponse> {
        let score = Self::validate_score(score)?;
        let comments = Self::normalize_comments(comments)?;

        let link = self
            .storage
            .get_link(link_id)
            .await?
            .ok_or_else(|| SurveyError::not_found(format!("Survey link {} not found", link_id)))?;

        if self.storage.response_exists(link_id).await? {
            return Err(SurveyError::duplicate_response(format!(
                "Link {} already has a response",
                link_id
            )));
        }

        if link.is_expired_at(now) {
            debug!(
                "ResponseLedger: rejected submission for expired link {} (expired at {})",
                link_id,
                link.expires_at.to_rfc3339()
            );
            return Err(SurveyError::link_expired(format!(
                "Link {} expired at {}",
                link_id,
                link.expires_at.to_rfc3339()
            )));
        }

        let response = SurveyResponse {
            link_id: *link_id,
            score,
            comments,
            submitted_at: now,
        };

        if let Err(e) = self.storage.insert_response(&response).await {
            if matches!(e, SurveyError::DuplicateResponse(_)) {
                warn!("ResponseLedger: concurrent submission lost for link {}", link_id);
            }
            return Err(e);
        }

        info!("ResponseLedger: recorded response for link {}", link_id);
        Ok(response)
    }

    pub async fn has_response(&self, link_id: &Uuid) -> Result<bool> {
        self.storage.response_exists(link_id).await
    }

    /// 批量检查，每个输入 id 都会出现在结果中
    pub async fn has_responses(&self, link_ids: &[Uuid]) -> Result<HashMap<Uuid, bool>> {
        let responded = self.storage.responded_link_ids(link_ids).await?;
        Ok(link_ids
            .iter()
            .map(|id| (*id, responded.contains(id)))
            .collect())
    }

    pub async fn get_response(&self, link_id: &Uuid) -> Result<Option<SurveyResponse>> {
        self.storage.get_response(link_id).await
    }
}
