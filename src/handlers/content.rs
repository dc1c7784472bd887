//! # Content API Handlers
//!
//! REST surface over the entity store and archival manager. All mutating
//! endpoints require actor headers for audit attribution; read paths filter
//! through the visibility evaluator using the injected clock unless the
//! caller pins `as_of` explicitly.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::actor::Actor;
use crate::error::ApiError;
use crate::handlers::ApiEnvelope;
use crate::lifecycle::ArchivalManager;
use crate::models::content_entity::{ContentKind, Model as ContentModel};
use crate::repositories::{
    ContentRepository, ContentScope, CreateContentRequest, UpdateContentRequest,
};
use crate::server::AppState;

/// A content row as returned by the API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContentDto {
    pub id: i64,
    pub kind: ContentKind,
    #[schema(example = "Autumn term opening ceremony")]
    pub title: String,
    pub body: Option<String>,
    pub is_active: bool,
    pub is_holiday: bool,
    /// Soft-delete timestamp (ISO 8601); null for live rows
    pub deleted_at: Option<String>,
    pub visibility_start_at: Option<String>,
    pub visibility_end_at: Option<String>,
    pub order_index: Option<i32>,
    pub created_by: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ContentModel> for ContentDto {
    fn from(model: ContentModel) -> Self {
        Self {
            id: model.id,
            kind: model.kind,
            title: model.title,
            body: model.body,
            is_active: model.is_active,
            is_holiday: model.is_holiday,
            deleted_at: model.deleted_at.map(|t| t.to_rfc3339()),
            visibility_start_at: model.visibility_start_at.map(|t| t.to_rfc3339()),
            visibility_end_at: model.visibility_end_at.map(|t| t.to_rfc3339()),
            order_index: model.order_index,
            created_by: model.created_by,
            created_at: model.created_at.to_rfc3339(),
            updated_at: model.updated_at.to_rfc3339(),
        }
    }
}

/// Request payload for creating a content row
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateContentDto {
    pub kind: ContentKind,
    #[schema(example = "Autumn term opening ceremony")]
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    /// Override for the per-kind activation default
    #[serde(default)]
    pub is_active: Option<bool>,
    /// Calendar events only
    #[serde(default)]
    pub is_holiday: bool,
    /// Announcements only (ISO 8601)
    #[serde(default)]
    pub visibility_start_at: Option<DateTime<Utc>>,
    /// Announcements only (ISO 8601)
    #[serde(default)]
    pub visibility_end_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub order_index: Option<i32>,
}

/// Request payload for a partial update. Omitted fields keep their value;
/// explicit nulls clear the column.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateContentDto {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub body: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub visibility_start_at: Option<Option<DateTime<Utc>>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub visibility_end_at: Option<Option<DateTime<Utc>>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub order_index: Option<Option<i32>>,
}

/// Distinguishes an explicit JSON null (clear the column) from an omitted
/// field (keep the current value).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Query parameters for listing visible rows
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListContentsParams {
    /// Restrict to one content kind
    pub kind: Option<ContentKind>,
    /// Evaluate visibility at this instant instead of the server clock
    pub as_of: Option<DateTime<Utc>>,
}

/// Query parameters for listing archived rows
#[derive(Debug, Deserialize, IntoParams)]
pub struct ArchivedParams {
    pub kind: Option<ContentKind>,
}

/// Query parameters for a single-row lookup
#[derive(Debug, Deserialize, IntoParams)]
pub struct GetContentParams {
    /// Allow the lookup to return soft-deleted rows
    #[serde(default)]
    pub include_archived: bool,
}

/// Result of a bulk archival sweep
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SweepResultDto {
    /// Ids of the rows that were archived
    pub archived_ids: Vec<i64>,
    pub archived_count: usize,
}

/// Create a content row
#[utoipa::path(
    post,
    path = "/api/v1/contents",
    request_body = CreateContentDto,
    responses(
        (status = 201, description = "Content created", body = ApiEnvelope<ContentDto>),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Missing actor headers", body = ApiError),
        (status = 409, description = "Display position already taken", body = ApiError)
    ),
    tag = "contents"
)]
pub async fn create_content(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<CreateContentDto>,
) -> Result<(StatusCode, Json<ApiEnvelope<ContentDto>>), ApiError> {
    let repo = ContentRepository::new(&state.db);
    let now = state.clock.now();

    let created = repo
        .create(
            CreateContentRequest {
                kind: request.kind,
                title: request.title,
                body: request.body,
                is_active: request.is_active,
                is_holiday: request.is_holiday,
                visibility_start_at: request.visibility_start_at,
                visibility_end_at: request.visibility_end_at,
                order_index: request.order_index,
            },
            actor.user_id,
            now,
        )
        .await?;

    // Creation is part of the audited lifecycle too.
    let entry = crate::repositories::AuditEntry::new(
        crate::models::audit_record::AuditAction::Create,
        created.kind.target_table(),
        Some(created.id),
        format!("Created {} {}", created.kind.target_table(), created.id),
        true,
        actor,
    );
    crate::repositories::AuditRecorder::new(&state.db)
        .record(entry, now)
        .await;

    Ok((
        StatusCode::CREATED,
        Json(ApiEnvelope::ok(created.into(), "Content created")),
    ))
}

/// List rows currently visible to end users
#[utoipa::path(
    get,
    path = "/api/v1/contents",
    params(ListContentsParams),
    responses(
        (status = 200, description = "Visible content rows", body = ApiEnvelope<Vec<ContentDto>>)
    ),
    tag = "contents"
)]
pub async fn list_contents(
    State(state): State<AppState>,
    Query(params): Query<ListContentsParams>,
) -> Result<Json<ApiEnvelope<Vec<ContentDto>>>, ApiError> {
    let repo = ContentRepository::new(&state.db);
    let as_of = params.as_of.unwrap_or_else(|| state.clock.now());

    let rows = repo.find_active(params.kind, as_of).await?;
    let count = rows.len();
    let data: Vec<ContentDto> = rows.into_iter().map(Into::into).collect();

    Ok(Json(ApiEnvelope::ok(
        data,
        format!("{} visible rows", count),
    )))
}

/// List archived (soft-deleted) rows
#[utoipa::path(
    get,
    path = "/api/v1/contents/archived",
    params(ArchivedParams),
    responses(
        (status = 200, description = "Archived content rows", body = ApiEnvelope<Vec<ContentDto>>)
    ),
    tag = "contents"
)]
pub async fn list_archived(
    State(state): State<AppState>,
    Query(params): Query<ArchivedParams>,
) -> Result<Json<ApiEnvelope<Vec<ContentDto>>>, ApiError> {
    let repo = ContentRepository::new(&state.db);

    let rows = repo.find_archived(params.kind).await?;
    let count = rows.len();
    let data: Vec<ContentDto> = rows.into_iter().map(Into::into).collect();

    Ok(Json(ApiEnvelope::ok(
        data,
        format!("{} archived rows", count),
    )))
}

/// Fetch a single content row
#[utoipa::path(
    get,
    path = "/api/v1/contents/{id}",
    params(
        ("id" = i64, Path, description = "Content row id"),
        GetContentParams
    ),
    responses(
        (status = 200, description = "Content row", body = ApiEnvelope<ContentDto>),
        (status = 404, description = "Row absent or outside the requested scope", body = ApiError)
    ),
    tag = "contents"
)]
pub async fn get_content(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<GetContentParams>,
) -> Result<Json<ApiEnvelope<ContentDto>>, ApiError> {
    let repo = ContentRepository::new(&state.db);
    let scope = if params.include_archived {
        ContentScope::Any
    } else {
        ContentScope::Live
    };

    let row = repo.get(id, scope).await?;
    Ok(Json(ApiEnvelope::ok(row.into(), "Content row")))
}

/// Update a content row's mutable fields
#[utoipa::path(
    put,
    path = "/api/v1/contents/{id}",
    params(("id" = i64, Path, description = "Content row id")),
    request_body = UpdateContentDto,
    responses(
        (status = 200, description = "Content updated", body = ApiEnvelope<ContentDto>),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Missing actor headers", body = ApiError),
        (status = 404, description = "Row not found", body = ApiError)
    ),
    tag = "contents"
)]
pub async fn update_content(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    actor: Actor,
    Json(request): Json<UpdateContentDto>,
) -> Result<Json<ApiEnvelope<ContentDto>>, ApiError> {
    let repo = ContentRepository::new(&state.db);
    let now = state.clock.now();

    let (before, after) = repo
        .update(
            id,
            UpdateContentRequest {
                title: request.title,
                body: request.body,
                visibility_start_at: request.visibility_start_at,
                visibility_end_at: request.visibility_end_at,
                order_index: request.order_index,
            },
            now,
        )
        .await?;

    let entry = crate::repositories::AuditEntry::new(
        crate::models::audit_record::AuditAction::Update,
        after.kind.target_table(),
        Some(after.id),
        format!("Updated {} {}", after.kind.target_table(), after.id),
        true,
        actor,
    )
    .with_values(
        serde_json::to_value(&before).ok(),
        serde_json::to_value(&after).ok(),
    );
    crate::repositories::AuditRecorder::new(&state.db)
        .record(entry, now)
        .await;

    Ok(Json(ApiEnvelope::ok(after.into(), "Content updated")))
}

/// Archive (soft-delete) a content row
#[utoipa::path(
    delete,
    path = "/api/v1/contents/{id}",
    params(("id" = i64, Path, description = "Content row id")),
    responses(
        (status = 200, description = "Content archived", body = ApiEnvelope<ContentDto>),
        (status = 401, description = "Missing actor headers", body = ApiError),
        (status = 404, description = "Row not found", body = ApiError),
        (status = 409, description = "Row already archived", body = ApiError)
    ),
    tag = "contents"
)]
pub async fn archive_content(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    actor: Actor,
) -> Result<Json<ApiEnvelope<ContentDto>>, ApiError> {
    let manager = ArchivalManager::new(&state.db);
    let row = manager.archive(id, actor, state.clock.now()).await?;
    Ok(Json(ApiEnvelope::ok(row.into(), "Content archived")))
}

/// Restore an archived content row
#[utoipa::path(
    post,
    path = "/api/v1/contents/{id}/restore",
    params(("id" = i64, Path, description = "Content row id")),
    responses(
        (status = 200, description = "Content restored", body = ApiEnvelope<ContentDto>),
        (status = 401, description = "Missing actor headers", body = ApiError),
        (status = 404, description = "Row not found", body = ApiError),
        (status = 409, description = "Row is not archived", body = ApiError)
    ),
    tag = "contents"
)]
pub async fn restore_content(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    actor: Actor,
) -> Result<Json<ApiEnvelope<ContentDto>>, ApiError> {
    let manager = ArchivalManager::new(&state.db);
    let row = manager.restore(id, actor, state.clock.now()).await?;
    Ok(Json(ApiEnvelope::ok(row.into(), "Content restored")))
}

/// Toggle a row's `is_active` flag
#[utoipa::path(
    put,
    path = "/api/v1/contents/{id}/toggle",
    params(("id" = i64, Path, description = "Content row id")),
    responses(
        (status = 200, description = "Activation toggled", body = ApiEnvelope<ContentDto>),
        (status = 401, description = "Missing actor headers", body = ApiError),
        (status = 404, description = "Row not found", body = ApiError)
    ),
    tag = "contents"
)]
pub async fn toggle_content(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    actor: Actor,
) -> Result<Json<ApiEnvelope<ContentDto>>, ApiError> {
    let manager = ArchivalManager::new(&state.db);
    let row = manager.toggle_active(id, actor, state.clock.now()).await?;
    Ok(Json(ApiEnvelope::ok(row.into(), "Activation toggled")))
}

/// Bulk-archive every inactive row, excluding holiday-protected entries
#[utoipa::path(
    post,
    path = "/api/v1/contents/archive-inactive",
    params(ArchivedParams),
    responses(
        (status = 200, description = "Sweep finished", body = ApiEnvelope<SweepResultDto>),
        (status = 401, description = "Missing actor headers", body = ApiError),
        (status = 409, description = "Lock contention; retry", body = ApiError)
    ),
    tag = "contents"
)]
pub async fn archive_inactive(
    State(state): State<AppState>,
    Query(params): Query<ArchivedParams>,
    actor: Actor,
) -> Result<Json<ApiEnvelope<SweepResultDto>>, ApiError> {
    let manager = ArchivalManager::new(&state.db);
    let outcome = manager
        .bulk_archive_inactive(params.kind, actor, state.clock.now())
        .await?;

    let archived_count = outcome.archived_ids.len();
    Ok(Json(ApiEnvelope::ok(
        SweepResultDto {
            archived_ids: outcome.archived_ids,
            archived_count,
        },
        format!("Archived {} inactive rows", archived_count),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::AppConfig;
    use crate::server::{AppState, create_app};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::TimeZone;
    use migration::MigratorTrait;
    use sea_orm::Database;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn setup_test_app() -> (AppState, axum::Router) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();

        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 9, 5, 12, 0, 0).unwrap());
        let state = AppState {
            db,
            config: Arc::new(AppConfig::default()),
            clock: Arc::new(clock),
        };
        let app = create_app(state.clone());
        (state, app)
    }

    fn actor_headers() -> Vec<(&'static str, &'static str)> {
        vec![
            ("X-User-Type", "admin"),
            ("X-User-Id", "7"),
            ("Content-Type", "application/json"),
        ]
    }

    fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in actor_headers() {
            builder = builder.header(name, value);
        }
        match body {
            Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create_row(app: &axum::Router, payload: Value) -> Value {
        let response = app
            .clone()
            .oneshot(request("POST", "/api/v1/contents", Some(payload)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await
    }

    #[tokio::test]
    async fn test_create_content_success() {
        let (_state, app) = setup_test_app().await;

        let body = create_row(
            &app,
            json!({
                "kind": "announcement",
                "title": "Sports day schedule",
                "body": "Meet at the east field."
            }),
        )
        .await;

        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["kind"], "announcement");
        assert_eq!(body["data"]["is_active"], true);
        assert_eq!(body["data"]["deleted_at"], Value::Null);
        assert_eq!(body["data"]["created_by"], 7);
    }

    #[tokio::test]
    async fn test_create_validation_error() {
        let (_state, app) = setup_test_app().await;

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/v1/contents",
                Some(json!({"kind": "category", "title": "   "})),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "VALIDATION_FAILED");
    }

    #[tokio::test]
    async fn test_holiday_flag_rejected_outside_calendar() {
        let (_state, app) = setup_test_app().await;

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/v1/contents",
                Some(json!({
                    "kind": "announcement",
                    "title": "Not a holiday",
                    "is_holiday": true
                })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_actor_headers_rejected() {
        let (_state, app) = setup_test_app().await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/contents")
                    .header("Content-Type", "application/json")
                    .body(Body::from(
                        json!({"kind": "category", "title": "Clubs"}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_visibility_window_filters_listing() {
        // Fixed clock pins "now" to 2025-09-05 12:00:00 UTC.
        let (_state, app) = setup_test_app().await;

        create_row(
            &app,
            json!({
                "kind": "announcement",
                "title": "Inside window",
                "visibility_start_at": "2025-09-04T07:00:00Z",
                "visibility_end_at": "2025-09-10T17:00:00Z"
            }),
        )
        .await;
        create_row(
            &app,
            json!({
                "kind": "announcement",
                "title": "Window over",
                "visibility_end_at": "2025-09-01T00:00:00Z"
            }),
        )
        .await;

        let response = app
            .clone()
            .oneshot(request("GET", "/api/v1/contents?kind=announcement", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let titles: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["Inside window"]);

        // Pinning as_of past the window hides the announcement.
        let response = app
            .clone()
            .oneshot(request(
                "GET",
                "/api/v1/contents?kind=announcement&as_of=2025-09-11T00:00:00Z",
                None,
            ))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_archive_restore_round_trip() {
        let (_state, app) = setup_test_app().await;

        let created = create_row(&app, json!({"kind": "category", "title": "Clubs"})).await;
        let id = created["data"]["id"].as_i64().unwrap();

        let response = app
            .clone()
            .oneshot(request("DELETE", &format!("/api/v1/contents/{}", id), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["data"]["deleted_at"].is_string());

        // Archived rows disappear from the live lookup but show with the flag.
        let response = app
            .clone()
            .oneshot(request("GET", &format!("/api/v1/contents/{}", id), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .clone()
            .oneshot(request(
                "GET",
                &format!("/api/v1/contents/{}?include_archived=true", id),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                &format!("/api/v1/contents/{}/restore", id),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["deleted_at"], Value::Null);
    }

    #[tokio::test]
    async fn test_double_archive_conflicts() {
        let (_state, app) = setup_test_app().await;

        let created = create_row(&app, json!({"kind": "category", "title": "Sports"})).await;
        let id = created["data"]["id"].as_i64().unwrap();

        let first = app
            .clone()
            .oneshot(request("DELETE", &format!("/api/v1/contents/{}", id), None))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app
            .clone()
            .oneshot(request("DELETE", &format!("/api/v1/contents/{}", id), None))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);
        let body = body_json(second).await;
        assert_eq!(body["code"], "ALREADY_ARCHIVED");
    }

    #[tokio::test]
    async fn test_toggle_endpoint() {
        let (_state, app) = setup_test_app().await;

        let created = create_row(&app, json!({"kind": "welcome_card", "title": "Welcome"})).await;
        let id = created["data"]["id"].as_i64().unwrap();
        assert_eq!(created["data"]["is_active"], false);

        let response = app
            .clone()
            .oneshot(request(
                "PUT",
                &format!("/api/v1/contents/{}/toggle", id),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["is_active"], true);
    }

    #[tokio::test]
    async fn test_sweep_endpoint_skips_holidays() {
        let (_state, app) = setup_test_app().await;

        let holiday = create_row(
            &app,
            json!({
                "kind": "calendar_event",
                "title": "Founders day",
                "is_holiday": true,
                "is_active": false
            }),
        )
        .await;
        let plain = create_row(
            &app,
            json!({
                "kind": "calendar_event",
                "title": "Old practice session",
                "is_active": false
            }),
        )
        .await;

        let response = app
            .clone()
            .oneshot(request("POST", "/api/v1/contents/archive-inactive", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["archived_count"], 1);
        assert_eq!(
            body["data"]["archived_ids"][0],
            plain["data"]["id"].as_i64().unwrap()
        );

        // Holiday row is untouched: still live, still inactive.
        let holiday_id = holiday["data"]["id"].as_i64().unwrap();
        let response = app
            .clone()
            .oneshot(request(
                "GET",
                &format!("/api/v1/contents/{}", holiday_id),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["deleted_at"], Value::Null);
        assert_eq!(body["data"]["is_active"], false);
    }

    #[tokio::test]
    async fn test_audit_trail_endpoint() {
        let (_state, app) = setup_test_app().await;

        let created = create_row(&app, json!({"kind": "category", "title": "Music"})).await;
        let id = created["data"]["id"].as_i64().unwrap();

        app.clone()
            .oneshot(request("DELETE", &format!("/api/v1/contents/{}", id), None))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(request(
                "GET",
                &format!("/api/v1/audit?target_table=categories&target_id={}", id),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let records = body["data"].as_array().unwrap();
        assert_eq!(records.len(), 2);

        let actions: Vec<&str> = records
            .iter()
            .map(|record| record["action_type"].as_str().unwrap())
            .collect();
        assert!(actions.contains(&"DELETE"));
        assert!(actions.contains(&"CREATE"));
        assert!(records.iter().all(|record| record["is_success"] == true));
    }

    #[tokio::test]
    async fn test_error_body_echoes_forwarded_request_id() {
        let (_state, app) = setup_test_app().await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/v1/contents/9999")
                    .header("X-Request-Id", "req-1234")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["trace_id"], "req-1234");
    }

    #[tokio::test]
    async fn test_server_time_reports_injected_clock() {
        let (state, app) = setup_test_app().await;

        let response = app
            .clone()
            .oneshot(request("GET", "/api/v1/time", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(
            body["data"]["unix_ms"].as_i64().unwrap(),
            state.clock.now().timestamp_millis()
        );
    }
}
