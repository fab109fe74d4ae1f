pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20261001_000001_survey_links;
mod m20261001_000002_survey_responses;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000001_survey_links::Migration),
            Box::new(m20261001_000002_survey_responses::Migration),
        ]
    }
}
