//! Migration to create the append-only audit_records table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AuditRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuditRecords::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AuditRecords::ActionType).text().not_null())
                    .col(ColumnDef::new(AuditRecords::TargetTable).text().not_null())
                    .col(ColumnDef::new(AuditRecords::TargetId).big_integer())
                    .col(ColumnDef::new(AuditRecords::Description).text().not_null())
                    .col(
                        ColumnDef::new(AuditRecords::IsSuccess)
                            .boolean()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AuditRecords::UserType).text().not_null())
                    .col(
                        ColumnDef::new(AuditRecords::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AuditRecords::OldValues).json_binary())
                    .col(ColumnDef::new(AuditRecords::NewValues).json_binary())
                    .col(
                        ColumnDef::new(AuditRecords::PerformedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_audit_records_target")
                    .table(AuditRecords::Table)
                    .col(AuditRecords::TargetTable)
                    .col(AuditRecords::TargetId)
                    .col(AuditRecords::PerformedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuditRecords::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AuditRecords {
    Table,
    Id,
    ActionType,
    TargetTable,
    TargetId,
    Description,
    IsSuccess,
    UserType,
    UserId,
    OldValues,
    NewValues,
    PerformedAt,
}
