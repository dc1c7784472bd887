//! Visibility evaluator.
//!
//! Pure predicate deciding whether a content row is currently shown to end
//! users. No I/O and no wall-clock access; `as_of` always comes from the
//! caller so the same instant is used across a request.

use chrono::{DateTime, Utc};

use crate::models::content_entity::Model as ContentModel;

/// Returns true when the row is active, not soft-deleted, and `as_of` falls
/// inside its display window. Both window bounds are inclusive; a null
/// bound is unbounded on that side.
pub fn is_visible(entity: &ContentModel, as_of: DateTime<Utc>) -> bool {
    if !entity.is_active || entity.deleted_at.is_some() {
        return false;
    }

    if let Some(start) = entity.visibility_start_at
        && start.with_timezone(&Utc) > as_of
    {
        return false;
    }

    if let Some(end) = entity.visibility_end_at
        && end.with_timezone(&Utc) < as_of
    {
        return false;
    }

    true
}
