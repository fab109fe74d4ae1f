//! NPS 统计相关的数据库查询
//!
//! 在数据库中按 (日期, 分数) 分组计数，内存占用只与天数相关，与回复数量无关。

use sea_orm::{
    ColumnTrait, ConnectionTrait, DbBackend, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, sea_query::Expr,
};
use tracing::debug;

use super::SeaOrmStorage;
use super::query::response_condition;
use crate::errors::{Result, SurveyError};
use crate::storage::ResponseFilter;

use migration::entities::survey_response;

/// 按天、按分数的计数结果行
#[derive(Debug, FromQueryResult)]
pub struct DailyScoreRow {
    /// UTC 日期，格式 YYYY-MM-DD
    pub day: String,
    pub score: i16,
    pub count: i64,
}

impl SeaOrmStorage {
    /// submitted_at 的 UTC 日期表达式
    fn submitted_day_expr(&self) -> Expr {
        const COLUMN: &str = "survey_responses.submitted_at";
        match self.db.get_database_backend() {
            DbBackend::Sqlite => Expr::cust(format!("strftime('%Y-%m-%d', {})", COLUMN)),
            DbBackend::MySql => Expr::cust(format!("DATE_FORMAT({}, '%Y-%m-%d')", COLUMN)),
            _ => Expr::cust(format!(
                "TO_CHAR({} AT TIME ZONE 'UTC', 'YYYY-MM-DD')",
                COLUMN
            )),
        }
    }

    /// 按 (日期, 分数) 分组统计回复数
    pub async fn daily_score_counts(&self, filter: &ResponseFilter) -> Result<Vec<DailyScoreRow>> {
        let day_expr = self.submitted_day_expr();
        let mut query = survey_response::Entity::find();

        // campaign 过滤需要关联链接表
        if filter.campaign.is_some() {
            query = query.join(
                JoinType::InnerJoin,
                survey_response::Relation::SurveyLink.def(),
            );
        }

        let rows = query
            .select_only()
            .column_as(day_expr.clone(), "day")
            .column(survey_response::Column::Score)
            .column_as(survey_response::Column::Id.count(), "count")
            .filter(response_condition(filter))
            .group_by(day_expr)
            .group_by(survey_response::Column::Score)
            .order_by_asc(Expr::cust("day"))
            .into_model::<DailyScoreRow>()
            .all(&self.db)
            .await
            .map_err(|e| SurveyError::database_operation(format!("统计回复失败: {}", e)))?;

        debug!("daily_score_counts returned {} rows", rows.len());
        Ok(rows)
    }
}
