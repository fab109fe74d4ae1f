//! Survey response entity (at most one row per link)

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "survey_responses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub link_id: String,
    pub score: i16,
    #[sea_orm(column_type = "Text", nullable)]
    pub comments: Option<String>,
    pub submitted_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::survey_link::Entity",
        from = "Column::LinkId",
        to = "super::survey_link::Column::Id"
    )]
    SurveyLink,
}

impl Related<super::survey_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SurveyLink.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
