//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations.

use std::collections::HashSet;

use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use tracing::{debug, error};
use uuid::Uuid;

use super::SeaOrmStorage;
use super::converters::{model_to_link, model_to_response};
use crate::errors::{Result, SurveyError};
use crate::storage::{LinkFilter, ResponseFilter, SortOrder, SurveyLink, SurveyResponse};

use migration::entities::{survey_link, survey_response};

/// IN 子句单批最大参数数量（SQLite 默认上限 999）
const IN_CHUNK_SIZE: usize = 500;

fn link_condition(filter: &LinkFilter) -> Condition {
    let mut condition = Condition::all();

    // campaign: 子串匹配
    if let Some(ref campaign) = filter.campaign {
        condition = condition.add(survey_link::Column::CampaignId.contains(campaign));
    }

    if let Some(ref after) = filter.created_after {
        condition = condition.add(survey_link::Column::CreatedAt.gte(*after));
    }

    if let Some(ref before) = filter.created_before {
        condition = condition.add(survey_link::Column::CreatedAt.lte(*before));
    }

    condition
}

pub(super) fn response_condition(filter: &ResponseFilter) -> Condition {
    let mut condition = Condition::all();

    if let Some(ref after) = filter.submitted_after {
        condition = condition.add(survey_response::Column::SubmittedAt.gte(*after));
    }

    if let Some(ref before) = filter.submitted_before {
        condition = condition.add(survey_response::Column::SubmittedAt.lte(*before));
    }

    if let Some(ref campaign) = filter.campaign {
        condition = condition.add(survey_link::Column::CampaignId.contains(campaign));
    }

    // search: comments 模糊匹配（无评论的回复不会命中）
    if let Some(ref search) = filter.search {
        condition = condition.add(survey_response::Column::Comments.contains(search));
    }

    condition
}

impl SeaOrmStorage {
    /// 按 id 获取链接
    pub async fn get_link(&self, id: &Uuid) -> Result<Option<SurveyLink>> {
        let model = survey_link::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| {
                error!("查询调查链接失败: {}", e);
                SurveyError::database_operation(format!("查询调查链接失败: {}", e))
            })?;

        model.map(model_to_link).transpose()
    }

    /// 批量按 id 获取链接
    ///
    /// 按 IN_CHUNK_SIZE 分批，每批一条查询。不存在的 id 不出现在结果中。
    pub async fn get_links_by_ids(&self, ids: &[Uuid]) -> Result<Vec<SurveyLink>> {
        let mut links = Vec::with_capacity(ids.len());

        for chunk in ids.chunks(IN_CHUNK_SIZE) {
            let models = survey_link::Entity::find()
                .filter(survey_link::Column::Id.is_in(chunk.iter().map(|id| id.to_string())))
                .all(&self.db)
                .await
                .map_err(|e| {
                    error!("批量查询调查链接失败: {}", e);
                    SurveyError::database_operation(format!("批量查询调查链接失败: {}", e))
                })?;

            for model in models {
                links.push(model_to_link(model)?);
            }
        }

        debug!("get_links_by_ids: {} requested, {} found", ids.len(), links.len());
        Ok(links)
    }

    /// 按过滤条件列出链接
    ///
    /// 同一 created_at 的链接以 id 作为次序键，保证输出稳定。
    pub async fn list_links(&self, filter: &LinkFilter) -> Result<Vec<SurveyLink>> {
        let query = survey_link::Entity::find().filter(link_condition(filter));

        let query = match filter.order {
            SortOrder::Desc => query
                .order_by_desc(survey_link::Column::CreatedAt)
                .order_by_desc(survey_link::Column::Id),
            SortOrder::Asc => query
                .order_by_asc(survey_link::Column::CreatedAt)
                .order_by_asc(survey_link::Column::Id),
        };

        let models = query
            .all(&self.db)
            .await
            .map_err(|e| SurveyError::database_operation(format!("列出调查链接失败: {}", e)))?;

        debug!("list_links returned {} rows", models.len());
        models.into_iter().map(model_to_link).collect()
    }

    /// 统计符合条件的链接数量
    pub async fn count_links(&self, filter: &LinkFilter) -> Result<u64> {
        survey_link::Entity::find()
            .filter(link_condition(filter))
            .count(&self.db)
            .await
            .map_err(|e| SurveyError::database_operation(format!("统计调查链接失败: {}", e)))
    }

    /// 链接是否已有回复
    pub async fn response_exists(&self, link_id: &Uuid) -> Result<bool> {
        let count = survey_response::Entity::find()
            .filter(survey_response::Column::LinkId.eq(link_id.to_string()))
            .count(&self.db)
            .await
            .map_err(|e| SurveyError::database_operation(format!("查询回复失败: {}", e)))?;

        Ok(count > 0)
    }

    /// 批量查询已有回复的链接 id
    ///
    /// 按 IN_CHUNK_SIZE 分批执行，每批一条查询。
    pub async fn responded_link_ids(&self, link_ids: &[Uuid]) -> Result<HashSet<Uuid>> {
        let mut responded = HashSet::with_capacity(link_ids.len());
        if link_ids.is_empty() {
            return Ok(responded);
        }

        for chunk in link_ids.chunks(IN_CHUNK_SIZE) {
            let rows: Vec<String> = survey_response::Entity::find()
                .select_only()
                .column(survey_response::Column::LinkId)
                .filter(
                    survey_response::Column::LinkId.is_in(chunk.iter().map(|id| id.to_string())),
                )
                .into_tuple::<String>()
                .all(&self.db)
                .await
                .map_err(|e| {
                    SurveyError::database_operation(format!("批量查询回复失败: {}", e))
                })?;

            for raw in rows {
                let id = Uuid::parse_str(&raw).map_err(|e| {
                    SurveyError::database_operation(format!("无效的链接 id '{}': {}", raw, e))
                })?;
                responded.insert(id);
            }
        }

        Ok(responded)
    }

    /// 获取某个链接的回复
    pub async fn get_response(&self, link_id: &Uuid) -> Result<Option<SurveyResponse>> {
        let model = survey_response::Entity::find()
            .filter(survey_response::Column::LinkId.eq(link_id.to_string()))
            .one(&self.db)
            .await
            .map_err(|e| SurveyError::database_operation(format!("查询回复失败: {}", e)))?;

        model.map(model_to_response).transpose()
    }

    /// 回复总数（不带过滤）
    pub async fn count_responses(&self) -> Result<u64> {
        survey_response::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| SurveyError::database_operation(format!("统计回复失败: {}", e)))
    }
}
