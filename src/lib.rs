//! Jewelry Store API Library
//!
//! Storefront catalog queries, back-office reports built on the sales
//! analytics aggregator, and validated write commands.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod analytics;
pub mod commands;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod middleware_helpers;
pub mod migrator;
pub mod models;
pub mod openapi;
pub mod services;
pub mod tracing;

use axum::{extract::State, response::Json, routing::get, Router};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::analytics::Calendar;
use crate::commands::CommandSink;
use crate::services::{AnalyticsService, ProductCatalogService, ReportSettings};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub catalog: ProductCatalogService,
    pub analytics: AnalyticsService,
    pub commands: Arc<dyn CommandSink>,
}

impl AppState {
    /// Wires the services over one connection. `calendar` decides what
    /// "today" and "this month" mean for the reports.
    pub fn new(
        db: Arc<DatabaseConnection>,
        config: config::AppConfig,
        calendar: Calendar,
        commands: Arc<dyn CommandSink>,
    ) -> Self {
        let settings = ReportSettings::from(&config);
        Self {
            catalog: ProductCatalogService::new(db.clone()),
            analytics: AnalyticsService::new(db.clone(), calendar, settings),
            db,
            config,
            commands,
        }
    }
}

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: crate::tracing::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            meta: Some(ResponseMeta::capture()),
        }
    }
}

#[cfg(test)]
mod response_tests {
    use super::*;
    use chrono::DateTime;

    #[tokio::test]
    async fn success_response_includes_request_metadata() {
        let response =
            crate::tracing::scope_request_id(crate::tracing::RequestId::new("meta-123"), async {
                ApiResponse::success("ok")
            })
            .await;

        let meta = response.meta.expect("metadata expected");
        assert_eq!(meta.request_id.as_deref(), Some("meta-123"));
        DateTime::parse_from_rfc3339(&meta.timestamp).expect("timestamp should parse");
    }

    #[tokio::test]
    async fn error_response_includes_request_metadata() {
        let response =
            crate::tracing::scope_request_id(crate::tracing::RequestId::new("meta-err"), async {
                ApiResponse::<()>::error("oops".into())
            })
            .await;

        let meta = response.meta.expect("metadata expected");
        assert_eq!(meta.request_id.as_deref(), Some("meta-err"));
        assert!(response.data.is_none());
    }

    #[test]
    fn outside_a_request_there_is_no_request_id() {
        let response = ApiResponse::success(1);
        assert!(response.meta.expect("metadata expected").request_id.is_none());
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// Versioned API: storefront catalog and back office
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        .nest("/products", handlers::products::products_routes())
        .nest("/admin", handlers::admin::admin_routes())
}

/// Full application router without CORS or compression, which the binary adds
/// from configuration.
pub fn build_router(state: AppState) -> Router {
    Router::<AppState>::new()
        .route("/", get(|| async { "jewelry-store-api up" }))
        .nest("/api/v1", api_v1_routes())
        .merge(openapi::swagger_ui())
        .layer(crate::tracing::configure_http_tracing())
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/status",
    responses((status = 200, description = "Service status", body = ApiResponse<serde_json::Value>)),
    tag = "Health"
)]
pub async fn api_status(State(state): State<AppState>) -> ApiResult<Value> {
    let status_data = json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "jewelry-store-api",
        "environment": state.config.environment,
        "currency": state.config.currency,
        "timestamp": Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(status_data)))
}

#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses((status = 200, description = "Database connectivity", body = ApiResponse<serde_json::Value>)),
    tag = "Health"
)]
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Value> {
    let db_status = match db::check_connection(&state.db).await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    let health_data = json!({
        "status": db_status,
        "checks": {
            "database": db_status,
        },
        "timestamp": Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(health_data)))
}
