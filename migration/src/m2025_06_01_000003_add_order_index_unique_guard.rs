//! Adds a partial unique index keeping order_index unique among live rows.
//!
//! Display position must be unique within the non-deleted rows of a kind;
//! archived rows may reuse any position, so the index excludes rows with a
//! deleted_at marker.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{DatabaseBackend, Statement};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        match backend {
            DatabaseBackend::Postgres => {
                manager
                    .get_connection()
                    .execute(Statement::from_string(
                        backend,
                        "DO $$\nBEGIN\n    IF NOT EXISTS (\n        SELECT 1 FROM pg_indexes\n        WHERE schemaname = current_schema()\n          AND indexname = 'idx_content_entities_live_order'\n    ) THEN\n        CREATE UNIQUE INDEX idx_content_entities_live_order\n            ON content_entities (kind, order_index)\n            WHERE deleted_at IS NULL\n              AND order_index IS NOT NULL;\n    END IF;\nEND\n$$;"
                            .to_string(),
                    ))
                    .await
                    .map(|_| ())
            }
            _ => manager
                .get_connection()
                .execute(Statement::from_string(
                    backend,
                    "CREATE UNIQUE INDEX IF NOT EXISTS idx_content_entities_live_order \
                     ON content_entities (kind, order_index) \
                     WHERE deleted_at IS NULL AND order_index IS NOT NULL"
                        .to_string(),
                ))
                .await
                .map(|_| ()),
        }
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute(Statement::from_string(
                manager.get_database_backend(),
                "DROP INDEX IF EXISTS idx_content_entities_live_order",
            ))
            .await
            .map(|_| ())
    }
}
