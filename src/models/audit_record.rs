//! Audit record entity model
//!
//! SeaORM entity for the append-only audit_records table. Rows are created
//! once per lifecycle mutation and never updated or deleted.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle action recorded in the audit trail.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    #[sea_orm(string_value = "CREATE")]
    Create,
    #[sea_orm(string_value = "UPDATE")]
    Update,
    #[sea_orm(string_value = "DELETE")]
    Delete,
    #[sea_orm(string_value = "RESTORE")]
    Restore,
    #[sea_orm(string_value = "TOGGLE_STATUS")]
    ToggleStatus,
    #[sea_orm(string_value = "LOGIN")]
    Login,
    #[sea_orm(string_value = "LOGOUT")]
    Logout,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// What happened
    pub action_type: AuditAction,

    /// Source table of the affected row (e.g. "announcements")
    pub target_table: String,

    /// Id of the affected row, when one exists
    pub target_id: Option<i64>,

    /// Human-readable outcome description
    pub description: String,

    /// Derived strictly from the mutation's own result
    pub is_success: bool,

    /// Actor classification (e.g. "admin", "system")
    pub user_type: String,

    /// Actor identifier
    pub user_id: i64,

    /// Snapshot of the mutated columns before the change
    pub old_values: Option<Json>,

    /// Snapshot of the mutated columns after the change
    pub new_values: Option<Json>,

    pub performed_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
