//! # Archival Manager
//!
//! Lifecycle state machine for content rows: Active -> Archived (soft
//! delete) -> Active (restored), with the `is_active` toggle as an
//! orthogonal sub-state that never implies deletion. Every mutation emits
//! exactly one audit record per affected row before returning, and the
//! record's success flag comes from the mutation's own result.
//!
//! The bulk sweep runs in a single transaction holding `FOR UPDATE` row
//! locks so a concurrent restore cannot race it; holiday rows are excluded
//! in the base query itself, not by an optional flag.

use chrono::{DateTime, Utc};
use metrics::counter;
use sea_orm::sea_query::{LockBehavior, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde_json::json;
use tracing::{debug, info};

use crate::actor::Actor;
use crate::error::{LifecycleError, is_lock_contention};
use crate::models::audit_record::AuditAction;
use crate::models::content_entity::{
    Column as ContentColumn, ContentKind, Entity as ContentEntity, Model as ContentModel,
};
use crate::repositories::{AuditEntry, AuditRecorder};

/// Result of a bulk archival sweep.
#[derive(Debug, Default)]
pub struct SweepOutcome {
    /// Ids of the rows that received a soft-delete marker
    pub archived_ids: Vec<i64>,
}

/// Soft-delete, restore and toggle operations over content rows.
pub struct ArchivalManager<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ArchivalManager<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Soft-delete a row. Fails with [`LifecycleError::AlreadyArchived`]
    /// when the marker is already set; the rejected call emits no audit
    /// record since nothing mutated.
    pub async fn archive(
        &self,
        id: i64,
        actor: Actor,
        now: DateTime<Utc>,
    ) -> Result<ContentModel, LifecycleError> {
        let row = self.load(id).await?;

        if row.deleted_at.is_some() {
            return Err(LifecycleError::AlreadyArchived { id });
        }

        let target_table = row.kind.target_table();
        let old_values = json!({ "deleted_at": null });

        let mut active = row.into_active_model();
        active.deleted_at = Set(Some(now.into()));
        active.updated_at = Set(now.into());
        let result = active.update(self.db).await;

        self.finish_single(
            AuditAction::Delete,
            target_table,
            id,
            actor,
            now,
            Some(old_values),
            Some(json!({ "deleted_at": now })),
            result,
            "Archived",
            "archive",
        )
        .await
    }

    /// Clear the soft-delete marker. Fails with
    /// [`LifecycleError::NotArchived`] when the row is live; this is the
    /// only path that resurrects a row.
    pub async fn restore(
        &self,
        id: i64,
        actor: Actor,
        now: DateTime<Utc>,
    ) -> Result<ContentModel, LifecycleError> {
        let row = self.load(id).await?;

        let Some(deleted_at) = row.deleted_at else {
            return Err(LifecycleError::NotArchived { id });
        };

        let target_table = row.kind.target_table();
        let old_values = json!({ "deleted_at": deleted_at });

        let mut active = row.into_active_model();
        active.deleted_at = Set(None);
        active.updated_at = Set(now.into());
        let result = active.update(self.db).await;

        self.finish_single(
            AuditAction::Restore,
            target_table,
            id,
            actor,
            now,
            Some(old_values),
            Some(json!({ "deleted_at": null })),
            result,
            "Restored",
            "restore",
        )
        .await
    }

    /// Flip `is_active`; independent of the soft-delete marker.
    pub async fn toggle_active(
        &self,
        id: i64,
        actor: Actor,
        now: DateTime<Utc>,
    ) -> Result<ContentModel, LifecycleError> {
        let row = self.load(id).await?;

        let target_table = row.kind.target_table();
        let was_active = row.is_active;

        let mut active = row.into_active_model();
        active.is_active = Set(!was_active);
        active.updated_at = Set(now.into());
        let result = active.update(self.db).await;

        let verb = if was_active { "Deactivated" } else { "Activated" };
        self.finish_single(
            AuditAction::ToggleStatus,
            target_table,
            id,
            actor,
            now,
            Some(json!({ "is_active": was_active })),
            Some(json!({ "is_active": !was_active })),
            result,
            verb,
            "toggle",
        )
        .await
    }

    /// Archive every live row with `is_active = false`, excluding holiday
    /// rows structurally. One transaction, `FOR UPDATE NOWAIT` locks, and
    /// audit rows committed atomically with the sweep.
    pub async fn bulk_archive_inactive(
        &self,
        kind: Option<ContentKind>,
        actor: Actor,
        now: DateTime<Utc>,
    ) -> Result<SweepOutcome, LifecycleError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let mut query = ContentEntity::find()
            .filter(ContentColumn::IsActive.eq(false))
            .filter(ContentColumn::DeletedAt.is_null())
            // Holiday protection: part of the base query, never optional.
            .filter(ContentColumn::IsHoliday.eq(false));

        if let Some(kind) = kind {
            query = query.filter(ContentColumn::Kind.eq(kind));
        }

        let rows = query
            .order_by_asc(ContentColumn::Id)
            .lock_with_behavior(LockType::Update, LockBehavior::Nowait)
            .all(&txn)
            .await
            .map_err(map_db_err)?;

        let mut outcome = SweepOutcome::default();

        for row in rows {
            let id = row.id;
            let target_table = row.kind.target_table();

            let mut active = row.into_active_model();
            active.deleted_at = Set(Some(now.into()));
            active.updated_at = Set(now.into());
            active.update(&txn).await.map_err(map_db_err)?;

            let entry = AuditEntry::new(
                AuditAction::Delete,
                target_table,
                Some(id),
                format!("Archived inactive {} {} via bulk sweep", target_table, id),
                true,
                actor.clone(),
            )
            .with_values(
                Some(json!({ "deleted_at": null })),
                Some(json!({ "deleted_at": now })),
            );

            AuditRecorder::append_on(&txn, entry, now)
                .await
                .map_err(map_db_err)?;

            outcome.archived_ids.push(id);
        }

        txn.commit().await.map_err(map_db_err)?;

        counter!("noticeboard_bulk_archived_rows_total")
            .increment(outcome.archived_ids.len() as u64);
        info!(
            archived = outcome.archived_ids.len(),
            kind = ?kind,
            "Bulk archival sweep finished"
        );

        Ok(outcome)
    }

    async fn load(&self, id: i64) -> Result<ContentModel, LifecycleError> {
        ContentEntity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(LifecycleError::NotFound { id })
    }

    /// Emit exactly one audit record for a single-row mutation attempt,
    /// with the success flag taken from the mutation result itself, then
    /// hand the result back to the caller.
    #[allow(clippy::too_many_arguments)]
    async fn finish_single(
        &self,
        action: AuditAction,
        target_table: &'static str,
        id: i64,
        actor: Actor,
        now: DateTime<Utc>,
        old_values: Option<serde_json::Value>,
        new_values: Option<serde_json::Value>,
        result: Result<ContentModel, DbErr>,
        success_verb: &str,
        metric_op: &'static str,
    ) -> Result<ContentModel, LifecycleError> {
        let is_success = result.is_ok();
        let description = if is_success {
            format!("{} {} {}", success_verb, target_table, id)
        } else {
            format!("Failed to {} {} {}", metric_op, target_table, id)
        };

        let entry = AuditEntry::new(
            action,
            target_table,
            Some(id),
            description,
            is_success,
            actor,
        )
        .with_values(old_values, new_values);

        let recorder = AuditRecorder::new(self.db);
        recorder.record(entry, now).await;

        counter!("noticeboard_lifecycle_operations_total", "op" => metric_op, "outcome" => if is_success { "success" } else { "failure" })
            .increment(1);
        debug!(target_table, id, op = metric_op, is_success, "Lifecycle operation recorded");

        result.map_err(|err| map_db_err(err))
    }
}

fn map_db_err(err: DbErr) -> LifecycleError {
    if is_lock_contention(&err) {
        LifecycleError::ConcurrencyConflict
    } else {
        LifecycleError::Database(err)
    }
}
