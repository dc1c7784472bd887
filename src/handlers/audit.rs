//! # Audit Trail Handlers
//!
//! Read-only access to the append-only audit trail for one target row.

use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;
use crate::handlers::ApiEnvelope;
use crate::models::audit_record::{AuditAction, Model as AuditModel};
use crate::repositories::AuditRecorder;
use crate::server::AppState;

/// One audit trail entry
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuditRecordDto {
    pub id: i64,
    pub action_type: AuditAction,
    #[schema(example = "announcements")]
    pub target_table: String,
    pub target_id: Option<i64>,
    pub description: String,
    pub is_success: bool,
    pub user_type: String,
    pub user_id: i64,
    pub old_values: Option<serde_json::Value>,
    pub new_values: Option<serde_json::Value>,
    /// When the action happened (ISO 8601)
    pub performed_at: String,
}

impl From<AuditModel> for AuditRecordDto {
    fn from(model: AuditModel) -> Self {
        Self {
            id: model.id,
            action_type: model.action_type,
            target_table: model.target_table,
            target_id: model.target_id,
            description: model.description,
            is_success: model.is_success,
            user_type: model.user_type,
            user_id: model.user_id,
            old_values: model.old_values,
            new_values: model.new_values,
            performed_at: model.performed_at.to_rfc3339(),
        }
    }
}

/// Query parameters for the audit trail lookup
#[derive(Debug, Deserialize, IntoParams)]
pub struct AuditTrailParams {
    /// Source table of the audited row
    pub target_table: String,
    /// Id of the audited row
    pub target_id: i64,
}

/// List the audit trail for one content row, newest first
#[utoipa::path(
    get,
    path = "/api/v1/audit",
    params(AuditTrailParams),
    responses(
        (status = 200, description = "Audit trail entries", body = ApiEnvelope<Vec<AuditRecordDto>>),
        (status = 400, description = "Missing query parameters", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "audit"
)]
pub async fn list_audit_trail(
    State(state): State<AppState>,
    Query(params): Query<AuditTrailParams>,
) -> Result<Json<ApiEnvelope<Vec<AuditRecordDto>>>, ApiError> {
    let recorder = AuditRecorder::new(&state.db);
    let records = recorder
        .find_for_target(&params.target_table, params.target_id)
        .await?;

    let count = records.len();
    let data: Vec<AuditRecordDto> = records.into_iter().map(Into::into).collect();

    Ok(Json(ApiEnvelope::ok(
        data,
        format!("{} audit records", count),
    )))
}
