//! Status resolver
//!
//! 链接状态只由三样东西推导：是否已有回复、过期时间、调用方给出的 `now`。
//! 单个查询和批量查询共用同一个判定函数。

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use super::ResponseLedger;
use crate::errors::Result;
use crate::storage::{LinkStatus, SurveyLink};

pub struct StatusResolver {
    ledger: Arc<ResponseLedger>,
}

impl StatusResolver {
    pub fn new(ledger: Arc<ResponseLedger>) -> Self {
        Self { ledger }
    }

    /// 纯判定：responded 优先于 expired
    pub fn status_of(responded: bool, link: &SurveyLink, now: DateTime<Utc>) -> LinkStatus {
        if responded {
            LinkStatus::Responded
        } else if link.is_expired_at(now) {
            LinkStatus::Expired
        } else {
            LinkStatus::Active
        }
    }

    pub async fn resolve(&self, link: &SurveyLink, now: DateTime<Utc>) -> Result<LinkStatus> {
        let responded = self.ledger.has_response(&link.id).await?;
        Ok(Self::status_of(responded, link, now))
    }

    /// 批量判定，只发起一次批量回复查询
    pub async fn resolve_bulk(
        &self,
        links: &[SurveyLink],
        now: DateTime<Utc>,
    ) -> Result<HashMap<Uuid, LinkStatus>> {
        if links.is_empty() {
            return Ok(HashMap::new());
        }

        let ids: Vec<Uuid> = links.iter().map(|l| l.id).collect();
        let responded = self.ledger.has_responses(&ids).await?;

        let statuses: HashMap<Uuid, LinkStatus> = links
            .iter()
            .map(|link| {
                let has = responded.get(&link.id).copied().unwrap_or(false);
                (link.id, Self::status_of(has, link, now))
            })
            .collect();

        debug!("StatusResolver: resolved {} links in bulk", statuses.len());
        Ok(statuses)
    }
}
