//! survey_links 表迁移
//!
//! 链接记录创建后不可变、不删除（保留用于审计和报表）。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 survey_links 表
        manager
            .create_table(
                Table::create()
                    .table(SurveyLinks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SurveyLinks::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SurveyLinks::CampaignId)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SurveyLinks::Token)
                            .string_len(128)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(SurveyLinks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SurveyLinks::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // campaign 过滤
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_survey_links_campaign_id")
                    .table(SurveyLinks::Table)
                    .col(SurveyLinks::CampaignId)
                    .to_owned(),
            )
            .await?;

        // 按创建时间排序/范围过滤
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_survey_links_created_at")
                    .table(SurveyLinks::Table)
                    .col(SurveyLinks::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_survey_links_created_at")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_survey_links_campaign_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(SurveyLinks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SurveyLinks {
    #[sea_orm(iden = "survey_links")]
    Table,
    Id,
    CampaignId,
    Token,
    CreatedAt,
    ExpiresAt,
}
