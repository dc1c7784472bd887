//! # Data Models
//!
//! This module contains all the data models used throughout the Noticeboard
//! service.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod audit_record;
pub mod content_entity;

pub use audit_record::Entity as AuditRecord;
pub use content_entity::Entity as ContentEntity;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "noticeboard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
