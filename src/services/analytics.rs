use std::sync::Arc;

use chrono::{DateTime, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use super::records;
use crate::analytics::{
    self, breakdown_rows, money, top_products_series, trend_series, BarPoint, BreakdownRow,
    Calendar, SalesField, StockStatus, TrendPoint, WindowTotals,
};
use crate::config::AppConfig;
use crate::errors::ServiceError;
use crate::models::{InventoryLog, Product, Sale};

/// Report sizes and thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSettings {
    pub low_stock_threshold: u32,
    pub top_products_limit: usize,
    pub trend_months: u32,
    pub recent_sales_limit: usize,
    pub recent_inventory_logs_limit: u64,
    /// Low-stock products listed on the dashboard
    pub low_stock_preview_limit: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            low_stock_threshold: 5,
            top_products_limit: 5,
            trend_months: 6,
            recent_sales_limit: 5,
            recent_inventory_logs_limit: 10,
            low_stock_preview_limit: 5,
        }
    }
}

impl From<&AppConfig> for ReportSettings {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            low_stock_threshold: cfg.low_stock_threshold,
            top_products_limit: cfg.top_products_limit as usize,
            trend_months: cfg.trend_months,
            recent_sales_limit: cfg.recent_sales_limit as usize,
            recent_inventory_logs_limit: u64::from(cfg.recent_inventory_logs_limit),
            low_stock_preview_limit: cfg.low_stock_preview_limit as usize,
        }
    }
}

/// Sale row on the dashboard's recent activity list
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RecentSale {
    pub id: Uuid,
    pub product_id: Uuid,
    /// `None` when the product no longer exists
    pub product_name: Option<String>,
    pub customer_name: String,
    pub quantity: u32,
    #[schema(value_type = String)]
    pub total_amount: Decimal,
    pub sale_date: DateTime<Utc>,
}

impl From<&Sale> for RecentSale {
    fn from(sale: &Sale) -> Self {
        Self {
            id: sale.id,
            product_id: sale.product_id,
            product_name: sale.product_name().map(str::to_string),
            customer_name: sale.customer_name.clone(),
            quantity: sale.quantity,
            total_amount: money(sale.total_amount),
            sale_date: sale.sale_date,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardView {
    pub total_products: u64,
    pub active_products: u64,
    #[schema(value_type = String)]
    pub inventory_value: Decimal,
    #[schema(value_type = String)]
    pub today_revenue: Decimal,
    pub today_transactions: u64,
    pub low_stock_count: u64,
    pub low_stock_products: Vec<Product>,
    pub recent_sales: Vec<RecentSale>,
    /// Set when some inputs could not be loaded and zeros were substituted
    pub degraded: bool,
    pub generated_at: DateTime<Utc>,
}

/// Best-seller table row
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BestSeller {
    pub product_id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub total_sales: u64,
    pub quantity: u64,
    #[schema(value_type = String)]
    pub total_revenue: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SalesReport {
    #[schema(value_type = String)]
    pub total_revenue: Decimal,
    pub total_sales: u64,
    #[schema(value_type = String)]
    pub average_order_value: Decimal,
    pub current_month: WindowTotals,
    pub trend: Vec<TrendPoint>,
    pub top_products: Vec<BarPoint>,
    pub best_sellers: Vec<BestSeller>,
    pub category_breakdown: Vec<BreakdownRow>,
    pub material_breakdown: Vec<BreakdownRow>,
    pub degraded: bool,
    pub generated_at: DateTime<Utc>,
}

/// Inventory table row
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StockLevel {
    pub product_id: Uuid,
    pub name: String,
    pub category: String,
    pub material: String,
    pub stock_quantity: u32,
    #[schema(value_type = String)]
    pub price: Decimal,
    #[schema(value_type = String)]
    pub stock_value: Decimal,
    pub status: StockStatus,
    pub status_label: String,
}

impl From<&Product> for StockLevel {
    fn from(product: &Product) -> Self {
        let status = StockStatus::classify(product.stock_quantity);
        Self {
            product_id: product.id,
            name: product.name.clone(),
            category: product.category.clone(),
            material: product.material.clone(),
            stock_quantity: product.stock_quantity,
            price: money(product.price),
            stock_value: money(product.stock_value()),
            status,
            status_label: status.label().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InventoryReport {
    pub total_units: u64,
    #[schema(value_type = String)]
    pub inventory_value: Decimal,
    pub low_stock_count: u64,
    pub low_stock: Vec<Product>,
    pub recent_logs: Vec<InventoryLog>,
    pub stock_levels: Vec<StockLevel>,
    pub degraded: bool,
    pub generated_at: DateTime<Utc>,
}

/// Substitutes an empty value when a report input fails to load.
fn or_degraded<T: Default>(report: &'static str, input: &'static str, result: Result<T, ServiceError>) -> (T, bool) {
    match result {
        Ok(value) => (value, false),
        Err(e) => {
            warn!(report, input, error = %e, "report input unavailable, serving empty values");
            counter!("jewelry_store.reports.degraded", 1, "report" => report);
            (T::default(), true)
        }
    }
}

/// Builds the back-office dashboard, analytics and inventory views
#[derive(Clone)]
pub struct AnalyticsService {
    db: Arc<DatabaseConnection>,
    calendar: Calendar,
    settings: ReportSettings,
}

impl AnalyticsService {
    pub fn new(db: Arc<DatabaseConnection>, calendar: Calendar, settings: ReportSettings) -> Self {
        Self {
            db,
            calendar,
            settings,
        }
    }

    pub async fn dashboard(&self) -> DashboardView {
        info!("Building dashboard");
        let db = &*self.db;
        let (products, products_degraded) =
            or_degraded("dashboard", "products", records::load_products(db).await);
        let (sales, sales_degraded) =
            or_degraded("dashboard", "sales", records::load_sales(db).await);

        self.build_dashboard(&products, &sales, products_degraded || sales_degraded)
    }

    fn build_dashboard(&self, products: &[Product], sales: &[Sale], degraded: bool) -> DashboardView {
        let low_stock = analytics::low_stock(products, self.settings.low_stock_threshold);
        let today = analytics::today_window(sales, &self.calendar);

        // sales arrive newest first
        let recent_sales = sales
            .iter()
            .take(self.settings.recent_sales_limit)
            .map(RecentSale::from)
            .collect();

        DashboardView {
            total_products: products.len() as u64,
            active_products: analytics::active_count(products),
            inventory_value: money(analytics::inventory_value(products)),
            today_revenue: money(today.revenue),
            today_transactions: today.sales_count,
            low_stock_count: low_stock.len() as u64,
            low_stock_products: low_stock
                .into_iter()
                .take(self.settings.low_stock_preview_limit)
                .cloned()
                .collect(),
            recent_sales,
            degraded,
            generated_at: self.calendar.now(),
        }
    }

    pub async fn sales_report(&self) -> SalesReport {
        info!("Building sales report");
        let (sales, degraded) =
            or_degraded("sales", "sales", records::load_sales(&*self.db).await);
        self.build_sales_report(&sales, degraded)
    }

    fn build_sales_report(&self, sales: &[Sale], degraded: bool) -> SalesReport {
        let current = analytics::current_month_window(sales, &self.calendar);
        let buckets = analytics::monthly_window(sales, self.settings.trend_months, &self.calendar);
        let top = analytics::top_n(
            analytics::group_by_product(sales),
            self.settings.top_products_limit,
        );

        let best_sellers = top
            .iter()
            .map(|s| BestSeller {
                product_id: s.product_id,
                name: s.product.name.clone(),
                category: s.product.category.clone(),
                total_sales: s.total_sales,
                quantity: s.quantity,
                total_revenue: money(s.total_revenue),
            })
            .collect();

        SalesReport {
            total_revenue: money(analytics::total_revenue(sales)),
            total_sales: analytics::sales_count(sales),
            average_order_value: money(analytics::average_order_value(sales)),
            current_month: WindowTotals {
                revenue: money(current.revenue),
                sales_count: current.sales_count,
            },
            trend: trend_series(&buckets),
            top_products: top_products_series(&top),
            best_sellers,
            category_breakdown: breakdown_rows(&analytics::group_by_field(sales, SalesField::Category)),
            material_breakdown: breakdown_rows(&analytics::group_by_field(sales, SalesField::Material)),
            degraded,
            generated_at: self.calendar.now(),
        }
    }

    pub async fn inventory_report(&self) -> InventoryReport {
        info!("Building inventory report");
        let db = &*self.db;
        let (mut products, products_degraded) =
            or_degraded("inventory", "products", records::load_products(db).await);
        let (recent_logs, logs_degraded) = or_degraded(
            "inventory",
            "inventory_logs",
            records::recent_inventory_logs(db, self.settings.recent_inventory_logs_limit).await,
        );

        products.sort_by_key(|p| p.stock_quantity);
        let low_stock: Vec<Product> =
            analytics::low_stock(&products, self.settings.low_stock_threshold)
                .into_iter()
                .cloned()
                .collect();

        InventoryReport {
            total_units: analytics::units_in_stock(&products),
            inventory_value: money(analytics::inventory_value(&products)),
            low_stock_count: low_stock.len() as u64,
            low_stock,
            recent_logs,
            stock_levels: products.iter().map(StockLevel::from).collect(),
            degraded: products_degraded || logs_degraded,
            generated_at: self.calendar.now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductSnapshot;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    async fn unmigrated_service() -> AnalyticsService {
        let db = crate::db::establish_connection("sqlite::memory:").await.unwrap();
        AnalyticsService::new(
            Arc::new(db),
            Calendar::fixed_utc(Utc::now()),
            ReportSettings::default(),
        )
    }

    #[tokio::test]
    async fn missing_tables_degrade_instead_of_failing() {
        let service = unmigrated_service().await;

        let dashboard = service.dashboard().await;
        assert!(dashboard.degraded);
        assert_eq!(dashboard.total_products, 0);
        assert_eq!(dashboard.today_revenue, Decimal::ZERO);

        let report = service.sales_report().await;
        assert!(report.degraded);
        assert_eq!(report.trend.len(), 6);
        assert!(report.top_products.is_empty());

        let inventory = service.inventory_report().await;
        assert!(inventory.degraded);
        assert!(inventory.stock_levels.is_empty());
    }

    #[tokio::test]
    async fn sales_report_from_records() {
        let now = Utc.with_ymd_and_hms(2025, 1, 20, 12, 0, 0).unwrap();
        let mut service = unmigrated_service().await;
        service.calendar = Calendar::fixed_utc(now);

        let ring = ProductSnapshot::new("Diamond Eternity Band", Some("Ring"), Some("Platinum"), dec!(100)).unwrap();
        let chain = ProductSnapshot::new("Rope Chain", Some("Necklace"), Some("Gold"), dec!(50)).unwrap();
        let ring_id = Uuid::new_v4();
        let chain_id = Uuid::new_v4();
        let sales = vec![
            Sale::new(ring_id, 1, dec!(100), now).unwrap().with_product(ring.clone()),
            Sale::new(chain_id, 1, dec!(50), now).unwrap().with_product(chain),
            Sale::new(ring_id, 1, dec!(0), Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap())
                .unwrap()
                .with_product(ring),
        ];

        let report = service.build_sales_report(&sales, false);
        assert_eq!(report.total_sales, 3);
        assert_eq!(report.total_revenue, dec!(150));
        assert_eq!(report.average_order_value, dec!(50));
        assert_eq!(report.current_month.sales_count, 2);
        assert_eq!(report.trend.first().map(|p| p.month.as_str()), Some("Aug"));
        assert_eq!(report.trend[1].sales, 1);
        assert_eq!(report.top_products[0].name, "Diamond Eternit...");
        assert_eq!(report.best_sellers[0].total_sales, 2);
        assert_eq!(report.category_breakdown[0].name, "Ring");
        assert_eq!(report.material_breakdown[1].percentage, dec!(50));
    }

    #[tokio::test]
    async fn dashboard_preview_follows_configured_limit() {
        let mut service = unmigrated_service().await;
        service.settings.low_stock_preview_limit = 2;

        let products: Vec<Product> = [0, 1, 2, 3, 12]
            .into_iter()
            .map(|q| Product::new(format!("Stud {q}"), "Earrings", "Silver", dec!(30), q).unwrap())
            .collect();

        let dashboard = service.build_dashboard(&products, &[], false);
        assert_eq!(dashboard.low_stock_count, 4);
        let preview: Vec<&str> = dashboard
            .low_stock_products
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(preview, ["Stud 0", "Stud 1"]);
    }
}
