//! # Server Configuration
//!
//! This module contains the server setup and configuration for the
//! noticeboard API.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::clock::Clock;
use crate::config::AppConfig;
use crate::handlers;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    /// Injected time source; production uses the system clock, tests pin it
    pub clock: Arc<dyn Clock>,
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route(
            "/api/v1/contents",
            get(handlers::content::list_contents).post(handlers::content::create_content),
        )
        .route(
            "/api/v1/contents/archived",
            get(handlers::content::list_archived),
        )
        .route(
            "/api/v1/contents/archive-inactive",
            post(handlers::content::archive_inactive),
        )
        .route(
            "/api/v1/contents/{id}",
            get(handlers::content::get_content)
                .put(handlers::content::update_content)
                .delete(handlers::content::archive_content),
        )
        .route(
            "/api/v1/contents/{id}/restore",
            post(handlers::content::restore_content),
        )
        .route(
            "/api/v1/contents/{id}/toggle",
            put(handlers::content::toggle_content),
        )
        .route("/api/v1/audit", get(handlers::audit::list_audit_trail))
        .route("/api/v1/time", get(handlers::time::server_time))
        .layer(axum::middleware::from_fn(
            crate::telemetry::trace_context_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
}

/// Starts the server with the given configuration
pub async fn run_server(state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let addr = state
        .config
        .bind_addr()
        .map_err(|e| format!("Invalid server address: {}", e))?;
    let profile = state.config.profile.clone();

    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, %profile, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::content::create_content,
        crate::handlers::content::list_contents,
        crate::handlers::content::list_archived,
        crate::handlers::content::get_content,
        crate::handlers::content::update_content,
        crate::handlers::content::archive_content,
        crate::handlers::content::restore_content,
        crate::handlers::content::toggle_content,
        crate::handlers::content::archive_inactive,
        crate::handlers::audit::list_audit_trail,
        crate::handlers::time::server_time,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::models::content_entity::ContentKind,
            crate::handlers::content::ContentDto,
            crate::handlers::content::CreateContentDto,
            crate::handlers::content::UpdateContentDto,
            crate::handlers::content::SweepResultDto,
            crate::handlers::audit::AuditRecordDto,
            crate::handlers::time::ServerTimeDto,
            crate::error::ApiError,
        )
    ),
    info(
        title = "Noticeboard API",
        description = "Content lifecycle and visibility service for the school bulletin board",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
