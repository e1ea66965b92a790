//! Initial schema: tenants, identities, catalog, appointments, deductions,
//! approval history, uploads, sessions and the audit trail.

use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20250101_000001_create_salon_tables"
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
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const SCHEMA_SQL: &str = include_str!("../../migrations/0001_init.sql");

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS audit_logs;
DROP TABLE IF EXISTS sessions;
DROP TABLE IF EXISTS media_uploads;
DROP TABLE IF EXISTS professional_approvals;
DROP TABLE IF EXISTS individual_deductions;
DROP TABLE IF EXISTS standard_deductions;
DROP TABLE IF EXISTS appointments;
DROP TABLE IF EXISTS services;
DROP TABLE IF EXISTS profiles;
DROP TABLE IF EXISTS shops;
DROP TABLE IF EXISTS users;
";
