//! Migration to create the content_entities table.
//!
//! This table generalizes the bulletin board's content rows (calendar
//! events, announcements, categories, welcome cards, carousel images) into
//! one entity with shared lifecycle columns.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContentEntities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContentEntities::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ContentEntities::Kind).text().not_null())
                    .col(ColumnDef::new(ContentEntities::Title).text().not_null())
                    .col(ColumnDef::new(ContentEntities::Body).text())
                    .col(
                        ColumnDef::new(ContentEntities::IsActive)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ContentEntities::IsHoliday)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ContentEntities::DeletedAt).timestamp_with_time_zone(),
                    )
                    .col(
                        ColumnDef::new(ContentEntities::VisibilityStartAt)
                            .timestamp_with_time_zone(),
                    )
                    .col(
                        ColumnDef::new(ContentEntities::VisibilityEndAt)
                            .timestamp_with_time_zone(),
                    )
                    .col(ColumnDef::new(ContentEntities::OrderIndex).integer())
                    .col(
                        ColumnDef::new(ContentEntities::CreatedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ContentEntities::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ContentEntities::UpdatedAt)
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
                    .name("idx_content_entities_kind_deleted_at")
                    .table(ContentEntities::Table)
                    .col(ContentEntities::Kind)
                    .col(ContentEntities::DeletedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ContentEntities::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ContentEntities {
    Table,
    Id,
    Kind,
    Title,
    Body,
    IsActive,
    IsHoliday,
    DeletedAt,
    VisibilityStartAt,
    VisibilityEndAt,
    OrderIndex,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
