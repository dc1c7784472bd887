//! # Repository Layer
//!
//! This module contains repository implementations that encapsulate SeaORM
//! operations for the content entity store and the append-only audit trail.

pub mod audit;
pub mod content;

pub use audit::{AuditEntry, AuditRecorder};
pub use content::{ContentRepository, ContentScope, CreateContentRequest, UpdateContentRequest};
