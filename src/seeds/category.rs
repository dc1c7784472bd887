//! Category seeding functionality
//!
//! Bootstraps the board with the default category set on first start.
//! Seeding is idempotent: categories that already exist (live or archived)
//! are left alone.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::actor::Actor;
use crate::models::content_entity::{
    Column as ContentColumn, ContentKind, Entity as ContentEntity,
};
use crate::repositories::{ContentRepository, CreateContentRequest};

const DEFAULT_CATEGORIES: &[&str] = &["General", "Events", "Sports", "Clubs"];

/// Seeds the default categories when none exist yet.
pub async fn seed_categories(db: &DatabaseConnection, now: DateTime<Utc>) -> Result<()> {
    let existing = ContentEntity::find()
        .filter(ContentColumn::Kind.eq(ContentKind::Category))
        .all(db)
        .await?;

    if !existing.is_empty() {
        log::info!(
            "Found {} existing categories, skipping seed",
            existing.len()
        );
        return Ok(());
    }

    let repo = ContentRepository::new(db);
    let system = Actor::system();

    for (position, title) in DEFAULT_CATEGORIES.iter().enumerate() {
        log::info!("Creating category: {}", title);
        repo.create(
            CreateContentRequest {
                kind: ContentKind::Category,
                title: (*title).to_string(),
                body: None,
                is_active: None,
                is_holiday: false,
                visibility_start_at: None,
                visibility_end_at: None,
                order_index: Some(position as i32),
            },
            system.user_id,
            now,
        )
        .await?;
    }

    log::info!("Seeded {} default categories", DEFAULT_CATEGORIES.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use migration::MigratorTrait;
    use sea_orm::Database;

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let now = Utc.with_ymd_and_hms(2025, 9, 1, 8, 0, 0).unwrap();

        seed_categories(&db, now).await.unwrap();
        seed_categories(&db, now).await.unwrap();

        let categories = ContentEntity::find()
            .filter(ContentColumn::Kind.eq(ContentKind::Category))
            .all(&db)
            .await
            .unwrap();
        assert_eq!(categories.len(), DEFAULT_CATEGORIES.len());
        assert!(categories.iter().all(|row| row.is_active));
    }
}
