//! # API Handlers
//!
//! This module contains all the HTTP endpoint handlers for the Noticeboard
//! service. Successful responses use a `{success, data, message}` envelope;
//! errors use the problem+json [`crate::error::ApiError`] body.

use axum::response::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::ServiceInfo;

pub mod audit;
pub mod content;
pub mod time;

/// Standard success envelope for API responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiEnvelope<T> {
    /// Whether the request succeeded
    pub success: bool,
    /// Response payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable outcome summary
    pub message: String,
}

impl<T> ApiEnvelope<T> {
    pub fn ok<S: Into<String>>(data: T, message: S) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
        }
    }
}

/// Root handler that returns basic service information
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service information", body = ServiceInfo)
    ),
    tag = "root"
)]
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo::default())
}
