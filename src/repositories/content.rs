//! # Content Repository
//!
//! The entity store: CRUD persistence for content rows, scoped by
//! non-deleted status unless the caller explicitly asks for the archive.
//! Window checks on read paths are delegated to the visibility evaluator so
//! there is exactly one implementation of the visibility rule.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};

use crate::error::LifecycleError;
use crate::models::content_entity::{
    ActiveModel as ContentActiveModel, Column as ContentColumn, ContentKind,
    Entity as ContentEntity, Model as ContentModel,
};
use crate::visibility;

/// Which lifecycle slice a single-row lookup may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentScope {
    /// Only rows without a soft-delete marker
    Live,
    /// Only soft-deleted rows
    Archived,
    /// Any row regardless of deletion state
    Any,
}

/// Request data for creating a new content row
#[derive(Debug, Clone)]
pub struct CreateContentRequest {
    pub kind: ContentKind,
    pub title: String,
    pub body: Option<String>,
    /// Explicit override; defaults per kind when absent
    pub is_active: Option<bool>,
    pub is_holiday: bool,
    pub visibility_start_at: Option<DateTime<Utc>>,
    pub visibility_end_at: Option<DateTime<Utc>>,
    pub order_index: Option<i32>,
}

/// Partial update of a content row's mutable fields
#[derive(Debug, Clone, Default)]
pub struct UpdateContentRequest {
    pub title: Option<String>,
    pub body: Option<Option<String>>,
    pub visibility_start_at: Option<Option<DateTime<Utc>>>,
    pub visibility_end_at: Option<Option<DateTime<Utc>>>,
    pub order_index: Option<Option<i32>>,
}

impl UpdateContentRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.body.is_none()
            && self.visibility_start_at.is_none()
            && self.visibility_end_at.is_none()
            && self.order_index.is_none()
    }
}

/// Repository for content entity database operations
pub struct ContentRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ContentRepository<'a> {
    /// Create a new ContentRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert a new row with `deleted_at = NULL` and the kind's default
    /// `is_active` unless the request overrides it.
    pub async fn create(
        &self,
        request: CreateContentRequest,
        created_by: i64,
        now: DateTime<Utc>,
    ) -> Result<ContentModel, LifecycleError> {
        validate_title(&request.title)?;
        validate_kind_restrictions(
            request.kind,
            request.is_holiday,
            request.visibility_start_at,
            request.visibility_end_at,
        )?;
        validate_window(request.visibility_start_at, request.visibility_end_at)?;
        validate_order_index(request.order_index)?;

        let is_active = request
            .is_active
            .unwrap_or_else(|| request.kind.default_active());

        let row = ContentActiveModel {
            kind: Set(request.kind),
            title: Set(request.title.trim().to_string()),
            body: Set(request.body),
            is_active: Set(is_active),
            is_holiday: Set(request.is_holiday),
            deleted_at: Set(None),
            visibility_start_at: Set(request.visibility_start_at.map(Into::into)),
            visibility_end_at: Set(request.visibility_end_at.map(Into::into)),
            order_index: Set(request.order_index),
            created_by: Set(created_by),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        let inserted = row.insert(self.db).await?;
        Ok(inserted)
    }

    /// Apply a partial update to a live or archived row.
    pub async fn update(
        &self,
        id: i64,
        changes: UpdateContentRequest,
        now: DateTime<Utc>,
    ) -> Result<(ContentModel, ContentModel), LifecycleError> {
        if changes.is_empty() {
            return Err(LifecycleError::validation("No fields to update"));
        }

        let before = self.get(id, ContentScope::Any).await?;

        if let Some(title) = &changes.title {
            validate_title(title)?;
        }

        let start = changes
            .visibility_start_at
            .unwrap_or_else(|| before.visibility_start_at.map(|t| t.with_timezone(&Utc)));
        let end = changes
            .visibility_end_at
            .unwrap_or_else(|| before.visibility_end_at.map(|t| t.with_timezone(&Utc)));
        validate_kind_restrictions(before.kind, before.is_holiday, start, end)?;
        validate_window(start, end)?;
        if let Some(order_index) = changes.order_index {
            validate_order_index(order_index)?;
        }

        let mut row = before.clone().into_active_model();
        if let Some(title) = changes.title {
            row.title = Set(title.trim().to_string());
        }
        if let Some(body) = changes.body {
            row.body = Set(body);
        }
        if let Some(start) = changes.visibility_start_at {
            row.visibility_start_at = Set(start.map(Into::into));
        }
        if let Some(end) = changes.visibility_end_at {
            row.visibility_end_at = Set(end.map(Into::into));
        }
        if let Some(order_index) = changes.order_index {
            row.order_index = Set(order_index);
        }
        row.updated_at = Set(now.into());

        let after = row.update(self.db).await?;
        Ok((before, after))
    }

    /// Single-row lookup; `NotFound` when the row is absent or outside the
    /// requested scope.
    pub async fn get(&self, id: i64, scope: ContentScope) -> Result<ContentModel, LifecycleError> {
        let row = ContentEntity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(LifecycleError::NotFound { id })?;

        let in_scope = match scope {
            ContentScope::Live => row.deleted_at.is_none(),
            ContentScope::Archived => row.deleted_at.is_some(),
            ContentScope::Any => true,
        };

        if !in_scope {
            return Err(LifecycleError::NotFound { id });
        }

        Ok(row)
    }

    /// Rows that are active, not soft-deleted, and inside their visibility
    /// window at `as_of`.
    pub async fn find_active(
        &self,
        kind: Option<ContentKind>,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<ContentModel>, LifecycleError> {
        let mut query = ContentEntity::find()
            .filter(ContentColumn::IsActive.eq(true))
            .filter(ContentColumn::DeletedAt.is_null());

        if let Some(kind) = kind {
            query = query.filter(ContentColumn::Kind.eq(kind));
        }

        let rows = query
            .order_by_asc(ContentColumn::OrderIndex)
            .order_by_asc(ContentColumn::CreatedAt)
            .all(self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter(|row| visibility::is_visible(row, as_of))
            .collect())
    }

    /// Rows carrying a soft-delete marker.
    pub async fn find_archived(
        &self,
        kind: Option<ContentKind>,
    ) -> Result<Vec<ContentModel>, LifecycleError> {
        let mut query = ContentEntity::find().filter(ContentColumn::DeletedAt.is_not_null());

        if let Some(kind) = kind {
            query = query.filter(ContentColumn::Kind.eq(kind));
        }

        let rows = query
            .order_by_desc(ContentColumn::DeletedAt)
            .all(self.db)
            .await?;

        Ok(rows)
    }
}

fn validate_title(title: &str) -> Result<(), LifecycleError> {
    if title.trim().is_empty() {
        return Err(LifecycleError::validation("Title cannot be empty"));
    }
    if title.len() > 255 {
        return Err(LifecycleError::validation(
            "Title cannot exceed 255 characters",
        ));
    }
    Ok(())
}

fn validate_kind_restrictions(
    kind: ContentKind,
    is_holiday: bool,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<(), LifecycleError> {
    if is_holiday && !kind.supports_holiday_flag() {
        return Err(LifecycleError::validation(
            "Only calendar events can be marked as holidays",
        ));
    }
    if (start.is_some() || end.is_some()) && !kind.supports_visibility_window() {
        return Err(LifecycleError::validation(
            "Only announcements carry a visibility window",
        ));
    }
    Ok(())
}

fn validate_window(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<(), LifecycleError> {
    if let (Some(start), Some(end)) = (start, end)
        && start > end
    {
        return Err(LifecycleError::validation(
            "Visibility window start must not be after its end",
        ));
    }
    Ok(())
}

fn validate_order_index(order_index: Option<i32>) -> Result<(), LifecycleError> {
    if let Some(index) = order_index
        && index < 0
    {
        return Err(LifecycleError::validation(
            "Display position cannot be negative",
        ));
    }
    Ok(())
}
