//! Weekly availability, blocked periods and customer appointment requests.

use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20250201_000002_create_schedule_tables"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(SCHEMA_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const SCHEMA_SQL: &str = include_str!("../../migrations/0002_schedule.sql");

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS appointment_requests;
DROP TABLE IF EXISTS schedule_blocks;
DROP TABLE IF EXISTS professional_availability;
";
