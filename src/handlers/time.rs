//! # Server Time Handler
//!
//! The original application's clients computed visibility against their own
//! clocks and drifted from the server; this endpoint exposes the service's
//! injected time source so clients can correct for skew.

use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::handlers::ApiEnvelope;
use crate::server::AppState;

/// Current server time payload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServerTimeDto {
    /// Current server time (ISO 8601)
    #[schema(example = "2025-09-05T12:00:00Z")]
    pub server_time: String,
    /// Current server time as Unix milliseconds
    pub unix_ms: i64,
}

/// Report the server's current time
#[utoipa::path(
    get,
    path = "/api/v1/time",
    responses(
        (status = 200, description = "Current server time", body = ApiEnvelope<ServerTimeDto>)
    ),
    tag = "time"
)]
pub async fn server_time(State(state): State<AppState>) -> Json<ApiEnvelope<ServerTimeDto>> {
    let now = state.clock.now();
    Json(ApiEnvelope::ok(
        ServerTimeDto {
            server_time: now.to_rfc3339(),
            unix_ms: now.timestamp_millis(),
        },
        "Server time",
    ))
}
