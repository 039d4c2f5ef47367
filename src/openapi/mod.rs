use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Jewelry Store API",
        version = "1.0.0",
        description = r#"
# Jewelry Store API

Storefront catalog and back-office reporting for a single jewelry shop.

## Features

- **Catalog**: Filterable product listing, facets, featured items and category counts
- **Dashboard**: Inventory value, today's takings and low stock alerts
- **Analytics**: Six-month revenue trend, best sellers, category and material breakdowns
- **Inventory**: Stock status per product and recent stock movements
- **Commands**: Add products, record sales and adjust stock (accepted with 202)

## Error Handling

Failing requests return a consistent body:

```json
{
  "error": "Bad Request",
  "message": "Invalid input: minPrice must be a number, got 'cheap'",
  "request_id": "req-abc123xyz",
  "timestamp": "2024-01-01T00:00:00Z"
}
```

Reports never fail on a database error; they come back empty with `degraded: true`.
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "Catalog", description = "Storefront product endpoints"),
        (name = "Admin", description = "Back-office reports and commands"),
        (name = "Health", description = "Health check endpoints")
    ),
    paths(
        crate::handlers::products::list_products,
        crate::handlers::products::get_facets,
        crate::handlers::products::get_featured,
        crate::handlers::products::get_categories,
        crate::handlers::products::get_product,

        crate::handlers::admin::get_dashboard,
        crate::handlers::admin::get_sales_report,
        crate::handlers::admin::get_inventory_report,
        crate::handlers::admin::list_admin_products,
        crate::handlers::admin::add_product,
        crate::handlers::admin::record_sale,
        crate::handlers::admin::adjust_stock,

        crate::api_status,
        crate::health_check,
    ),
    components(
        schemas(
            crate::ApiResponse<serde_json::Value>,
            crate::ResponseMeta,

            crate::models::Product,
            crate::models::ProductSnapshot,
            crate::models::InventoryLog,
            crate::services::catalog::CatalogFacets,
            crate::services::catalog::CategoryCount,

            crate::services::analytics::DashboardView,
            crate::services::analytics::RecentSale,
            crate::services::analytics::SalesReport,
            crate::services::analytics::BestSeller,
            crate::services::analytics::InventoryReport,
            crate::services::analytics::StockLevel,
            crate::analytics::TrendPoint,
            crate::analytics::BarPoint,
            crate::analytics::BreakdownRow,
            crate::analytics::WindowTotals,
            crate::analytics::StockStatus,

            crate::commands::AddProductCommand,
            crate::commands::RecordSaleCommand,
            crate::commands::AdjustStockCommand,
            crate::commands::StockDirection,
            crate::commands::CommandAck,
            crate::commands::CommandKind,

            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
