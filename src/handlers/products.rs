use crate::{
    errors::ServiceError,
    handlers::common::{decimal_param, text_param},
    models::Product,
    services::catalog::{CatalogFacets, CategoryCount, ProductFilters},
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

/// Storefront query string. Numbers arrive as text so a malformed value is
/// reported as a 400 naming the parameter.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Case-insensitive substring of the product name
    pub search: Option<String>,
    pub category: Option<String>,
    pub material: Option<String>,
    pub model: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_weight: Option<String>,
    pub max_weight: Option<String>,
}

impl TryFrom<&ProductQuery> for ProductFilters {
    type Error = ServiceError;

    fn try_from(query: &ProductQuery) -> Result<Self, Self::Error> {
        Ok(ProductFilters {
            search: text_param(&query.search),
            category: text_param(&query.category),
            material: text_param(&query.material),
            model: text_param(&query.model),
            min_price: decimal_param("minPrice", &query.min_price)?,
            max_price: decimal_param("maxPrice", &query.max_price)?,
            min_weight: decimal_param("minWeight", &query.min_weight)?,
            max_weight: decimal_param("maxWeight", &query.max_weight)?,
        })
    }
}

pub fn products_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/facets", get(get_facets))
        .route("/featured", get(get_featured))
        .route("/categories", get(get_categories))
        .route("/:id", get(get_product))
}

/// List active products matching the shop filters
#[utoipa::path(
    get,
    path = "/api/v1/products",
    params(ProductQuery),
    responses(
        (status = 200, description = "Matching products, newest first", body = ApiResponse<Vec<Product>>,
            headers(("X-Request-Id" = String, description = "Unique request id for tracing"))
        ),
        (status = 400, description = "Malformed filter", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "Catalog"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> ApiResult<Vec<Product>> {
    let filters = ProductFilters::try_from(&query)?;
    let products = state.catalog.list_products(&filters).await?;
    Ok(Json(ApiResponse::success(products)))
}

/// Filter values present in the active catalog
#[utoipa::path(
    get,
    path = "/api/v1/products/facets",
    responses(
        (status = 200, description = "Categories, materials and models", body = ApiResponse<CatalogFacets>),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "Catalog"
)]
pub async fn get_facets(State(state): State<AppState>) -> ApiResult<CatalogFacets> {
    Ok(Json(ApiResponse::success(state.catalog.facets().await?)))
}

/// Newest active products for the home page
#[utoipa::path(
    get,
    path = "/api/v1/products/featured",
    responses(
        (status = 200, description = "Featured products", body = ApiResponse<Vec<Product>>),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "Catalog"
)]
pub async fn get_featured(State(state): State<AppState>) -> ApiResult<Vec<Product>> {
    let limit = u64::from(state.config.featured_products_limit);
    Ok(Json(ApiResponse::success(state.catalog.featured(limit).await?)))
}

/// Active product count per category
#[utoipa::path(
    get,
    path = "/api/v1/products/categories",
    responses(
        (status = 200, description = "Category counts", body = ApiResponse<Vec<CategoryCount>>),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "Catalog"
)]
pub async fn get_categories(State(state): State<AppState>) -> ApiResult<Vec<CategoryCount>> {
    Ok(Json(ApiResponse::success(state.catalog.category_counts().await?)))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product returned", body = ApiResponse<Product>),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "Catalog"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Product> {
    Ok(Json(ApiResponse::success(state.catalog.get_product(id).await?)))
}
