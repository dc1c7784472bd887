//! Database migrations for the Noticeboard service.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2025_06_01_000001_create_content_entities;
mod m2025_06_01_000002_create_audit_records;
mod m2025_06_01_000003_add_order_index_unique_guard;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2025_06_01_000001_create_content_entities::Migration),
            Box::new(m2025_06_01_000002_create_audit_records::Migration),
            Box::new(m2025_06_01_000003_add_order_index_unique_guard::Migration),
        ]
    }
}
