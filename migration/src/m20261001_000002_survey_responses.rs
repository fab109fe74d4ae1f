//! survey_responses 表迁移
//!
//! link_id 上的唯一索引是「每个链接最多一条回复」的存储层保证：
//! 并发提交时由数据库拒绝第二条插入，应用层再转换为 DuplicateResponse。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 survey_responses 表
        manager
            .create_table(
                Table::create()
                    .table(SurveyResponses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SurveyResponses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SurveyResponses::LinkId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SurveyResponses::Score)
                            .small_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SurveyResponses::Comments).text().null())
                    .col(
                        ColumnDef::new(SurveyResponses::SubmittedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_survey_responses_link_id")
                            .from(SurveyResponses::Table, SurveyResponses::LinkId)
                            .to(SurveyLinks::Table, SurveyLinks::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // 唯一索引：每个 link 至多一条回复
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_survey_responses_link_id")
                    .table(SurveyResponses::Table)
                    .col(SurveyResponses::LinkId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 提交时间索引（用于指标的时间范围查询）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_survey_responses_submitted_at")
                    .table(SurveyResponses::Table)
                    .col(SurveyResponses::SubmittedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_survey_responses_submitted_at")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_survey_responses_link_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(SurveyResponses::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SurveyResponses {
    #[sea_orm(iden = "survey_responses")]
    Table,
    Id,
    LinkId,
    Score,
    Comments,
    SubmittedAt,
}

#[derive(DeriveIden)]
enum SurveyLinks {
    #[sea_orm(iden = "survey_links")]
    Table,
    Id,
}
