//! # Audit Repository
//!
//! Append-only recorder for lifecycle transitions. Single-row operations
//! use [`AuditRecorder::record`], which never propagates its own write
//! failure — a committed business mutation must not be rolled back because
//! the trail could not be written. Bulk operations append through
//! [`AuditRecorder::append_on`] inside their own transaction so a failed
//! sweep commits no partial trail.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::actor::Actor;
use crate::error::LifecycleError;
use crate::models::audit_record::{
    ActiveModel as AuditActiveModel, AuditAction, Column as AuditColumn, Entity as AuditRecord,
    Model as AuditModel,
};

/// One audit trail entry, ready to append.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub action_type: AuditAction,
    pub target_table: String,
    pub target_id: Option<i64>,
    pub description: String,
    /// Derived from the mutation's actual result, never from a heuristic
    pub is_success: bool,
    pub actor: Actor,
    pub old_values: Option<serde_json::Value>,
    pub new_values: Option<serde_json::Value>,
}

impl AuditEntry {
    pub fn new<T: Into<String>, D: Into<String>>(
        action_type: AuditAction,
        target_table: T,
        target_id: Option<i64>,
        description: D,
        is_success: bool,
        actor: Actor,
    ) -> Self {
        Self {
            action_type,
            target_table: target_table.into(),
            target_id,
            description: description.into(),
            is_success,
            actor,
            old_values: None,
            new_values: None,
        }
    }

    pub fn with_values(
        mut self,
        old_values: Option<serde_json::Value>,
        new_values: Option<serde_json::Value>,
    ) -> Self {
        self.old_values = old_values;
        self.new_values = new_values;
        self
    }
}

/// Repository for the append-only audit trail
pub struct AuditRecorder<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AuditRecorder<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Append one record for a committed single-row mutation. Failure here
    /// is reported through logs and a counter, never to the caller: the
    /// business change already happened and stays committed.
    pub async fn record(&self, entry: AuditEntry, performed_at: DateTime<Utc>) {
        if let Err(err) = Self::append_on(self.db, entry.clone(), performed_at).await {
            metrics::counter!("noticeboard_audit_write_failures_total").increment(1);
            tracing::warn!(
                target_table = %entry.target_table,
                target_id = ?entry.target_id,
                action = ?entry.action_type,
                error = ?err,
                "Failed to append audit record; business mutation remains committed"
            );
        }
    }

    /// Append one record on the given connection, surfacing failures.
    /// Used directly by transactional callers.
    pub async fn append_on<C: ConnectionTrait>(
        conn: &C,
        entry: AuditEntry,
        performed_at: DateTime<Utc>,
    ) -> Result<AuditModel, sea_orm::DbErr> {
        let row = AuditActiveModel {
            action_type: Set(entry.action_type),
            target_table: Set(entry.target_table),
            target_id: Set(entry.target_id),
            description: Set(entry.description),
            is_success: Set(entry.is_success),
            user_type: Set(entry.actor.user_type),
            user_id: Set(entry.actor.user_id),
            old_values: Set(entry.old_values),
            new_values: Set(entry.new_values),
            performed_at: Set(performed_at.into()),
            ..Default::default()
        };

        row.insert(conn).await
    }

    /// Trail for one target row, newest first.
    pub async fn find_for_target(
        &self,
        target_table: &str,
        target_id: i64,
    ) -> Result<Vec<AuditModel>, LifecycleError> {
        let rows = AuditRecord::find()
            .filter(AuditColumn::TargetTable.eq(target_table))
            .filter(AuditColumn::TargetId.eq(target_id))
            .order_by_desc(AuditColumn::PerformedAt)
            .order_by_desc(AuditColumn::Id)
            .all(self.db)
            .await?;

        Ok(rows)
    }
}
