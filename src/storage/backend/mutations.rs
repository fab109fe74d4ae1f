//! Mutation operations for SeaOrmStorage
//!
//! This module contains all write database operations.
//! 链接与回复都只追加，不提供更新或删除。

use sea_orm::{DbErr, EntityTrait, SqlErr, sea_query::OnConflict};
use tracing::info;

use super::SeaOrmStorage;
use super::converters::{link_to_active_model, response_to_active_model};
use crate::errors::{Result, SurveyError};
use crate::storage::{SurveyLink, SurveyResponse};

use migration::entities::{survey_link, survey_response};

/// 判断是否为唯一约束冲突
fn is_unique_violation(err: &DbErr) -> bool {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
        return true;
    }
    let msg = err.to_string().to_lowercase();
    msg.contains("unique") || msg.contains("duplicate")
}

impl SeaOrmStorage {
    pub async fn insert_link(&self, link: &SurveyLink) -> Result<()> {
        survey_link::Entity::insert(link_to_active_model(link))
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    SurveyError::database_operation(format!(
                        "调查链接已存在: {}",
                        link.id
                    ))
                } else {
                    SurveyError::database_operation(format!("插入调查链接失败: {}", e))
                }
            })?;

        info!("Survey link created: {}", link.id);
        Ok(())
    }

    /// 原子写入回复
    ///
    /// 依赖 link_id 上的唯一索引完成 check-and-insert：
    /// 并发提交时只有一条能写入，其余得到 `DuplicateResponse`。
    pub async fn insert_response(&self, response: &SurveyResponse) -> Result<()> {
        let inserted = survey_response::Entity::insert(response_to_active_model(response))
            .on_conflict(
                OnConflict::column(survey_response::Column::LinkId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    SurveyError::duplicate_response(format!(
                        "Link {} already has a response",
                        response.link_id
                    ))
                } else {
                    SurveyError::database_operation(format!("写入回复失败: {}", e))
                }
            })?;

        if inserted == 0 {
            return Err(SurveyError::duplicate_response(format!(
                "Link {} already has a response",
                response.link_id
            )));
        }

        info!(
            "Survey response recorded: link={}, score={}",
            response.link_id, response.score
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_unique_violation_by_message() {
        assert!(is_unique_violation(&DbErr::Custom(
            "UNIQUE constraint failed: survey_responses.link_id".to_string()
        )));
        assert!(is_unique_violation(&DbErr::Custom(
            "Duplicate entry 'x' for key 'idx_survey_responses_link_id'".to_string()
        )));
        assert!(!is_unique_violation(&DbErr::Custom(
            "connection reset by peer".to_string()
        )));
    }
}
