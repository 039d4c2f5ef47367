use crate::{
    commands::{AddProductCommand, AdjustStockCommand, Command, CommandAck, RecordSaleCommand},
    handlers::common::{accepted_response, bool_param, text_param},
    models::Product,
    services::analytics::{DashboardView, InventoryReport, SalesReport},
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Query, State},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdminProductQuery {
    /// Matches name, category or material
    pub search: Option<String>,
    /// Defaults to true
    pub include_inactive: Option<String>,
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/analytics", get(get_sales_report))
        .route("/inventory", get(get_inventory_report))
        .route("/products", get(list_admin_products).post(add_product))
        .route("/sales", post(record_sale))
        .route("/inventory/adjustments", post(adjust_stock))
}

/// Headline figures for the back-office landing page
#[utoipa::path(
    get,
    path = "/api/v1/admin/dashboard",
    responses(
        (status = 200, description = "Dashboard figures; `degraded` is set when inputs failed to load", body = ApiResponse<DashboardView>)
    ),
    tag = "Admin"
)]
pub async fn get_dashboard(State(state): State<AppState>) -> ApiResult<DashboardView> {
    Ok(Json(ApiResponse::success(state.analytics.dashboard().await)))
}

/// Revenue trend, best sellers and breakdowns
#[utoipa::path(
    get,
    path = "/api/v1/admin/analytics",
    responses(
        (status = 200, description = "Sales report", body = ApiResponse<SalesReport>)
    ),
    tag = "Admin"
)]
pub async fn get_sales_report(State(state): State<AppState>) -> ApiResult<SalesReport> {
    Ok(Json(ApiResponse::success(state.analytics.sales_report().await)))
}

/// Stock levels, low stock alerts and recent inventory movements
#[utoipa::path(
    get,
    path = "/api/v1/admin/inventory",
    responses(
        (status = 200, description = "Inventory report", body = ApiResponse<InventoryReport>)
    ),
    tag = "Admin"
)]
pub async fn get_inventory_report(State(state): State<AppState>) -> ApiResult<InventoryReport> {
    Ok(Json(ApiResponse::success(state.analytics.inventory_report().await)))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/products",
    params(AdminProductQuery),
    responses(
        (status = 200, description = "All products, newest first", body = ApiResponse<Vec<Product>>),
        (status = 400, description = "Malformed query", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "Admin"
)]
pub async fn list_admin_products(
    State(state): State<AppState>,
    Query(query): Query<AdminProductQuery>,
) -> ApiResult<Vec<Product>> {
    let include_inactive = bool_param("include_inactive", &query.include_inactive)?.unwrap_or(true);
    let search = text_param(&query.search);
    let products = state
        .catalog
        .admin_products(search.as_deref(), include_inactive)
        .await?;
    Ok(Json(ApiResponse::success(products)))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/products",
    request_body = AddProductCommand,
    responses(
        (status = 202, description = "Product accepted", body = ApiResponse<CommandAck>,
            headers(("X-Request-Id" = String, description = "Unique request id"))
        ),
        (status = 400, description = "Invalid product", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "Admin"
)]
pub async fn add_product(
    State(state): State<AppState>,
    Json(command): Json<AddProductCommand>,
) -> Result<Response, crate::errors::ServiceError> {
    let ack = command.execute(state.db.clone(), state.commands.clone()).await?;
    info!(command_id = %ack.command_id, "add product accepted");
    Ok(accepted_response(ApiResponse::success(ack)))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/sales",
    request_body = RecordSaleCommand,
    responses(
        (status = 202, description = "Sale accepted", body = ApiResponse<CommandAck>),
        (status = 400, description = "Invalid sale", body = crate::errors::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Not enough stock", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "Admin"
)]
pub async fn record_sale(
    State(state): State<AppState>,
    Json(command): Json<RecordSaleCommand>,
) -> Result<Response, crate::errors::ServiceError> {
    let ack = command.execute(state.db.clone(), state.commands.clone()).await?;
    info!(command_id = %ack.command_id, product_id = %command.product_id, "sale accepted");
    Ok(accepted_response(ApiResponse::success(ack)))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/inventory/adjustments",
    request_body = AdjustStockCommand,
    responses(
        (status = 202, description = "Adjustment accepted", body = ApiResponse<CommandAck>),
        (status = 400, description = "Invalid adjustment", body = crate::errors::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Not enough stock", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "Admin"
)]
pub async fn adjust_stock(
    State(state): State<AppState>,
    Json(command): Json<AdjustStockCommand>,
) -> Result<Response, crate::errors::ServiceError> {
    let ack = command.execute(state.db.clone(), state.commands.clone()).await?;
    info!(command_id = %ack.command_id, product_id = %command.product_id, "stock adjustment accepted");
    Ok(accepted_response(ApiResponse::success(ack)))
}
