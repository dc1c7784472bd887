//! Actor identity for audit attribution.
//!
//! Authentication policy lives outside this service; mutating endpoints
//! only need to know who to write into the audit trail. The upstream
//! gateway forwards the authenticated identity in `X-User-Type` /
//! `X-User-Id` headers.

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, unauthorized};

pub const USER_TYPE_HEADER: &str = "x-user-type";
pub const USER_ID_HEADER: &str = "x-user-id";

/// Identity performing a lifecycle operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Actor classification, e.g. "admin" or "system"
    pub user_type: String,
    /// Actor identifier within its classification
    pub user_id: i64,
}

impl Actor {
    pub fn new<S: Into<String>>(user_type: S, user_id: i64) -> Self {
        Self {
            user_type: user_type.into(),
            user_id,
        }
    }

    /// Actor used for internal operations such as startup seeding.
    pub fn system() -> Self {
        Self::new("system", 0)
    }
}

impl<S> FromRequestParts<S> for Actor
where
    S: Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_type = parts
            .headers
            .get(USER_TYPE_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| unauthorized(Some("Missing X-User-Type header")))?;

        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i64>().ok())
            .ok_or_else(|| unauthorized(Some("Missing or malformed X-User-Id header")))?;

        Ok(Actor::new(user_type, user_id))
    }
}
