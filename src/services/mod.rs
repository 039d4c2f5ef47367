// Read-side services backing the storefront and back-office screens
pub mod analytics;
pub mod catalog;
pub mod records;

pub use analytics::{AnalyticsService, ReportSettings};
pub use catalog::{ProductCatalogService, ProductFilters};
