//! Sales analytics aggregator.
//!
//! Pure functions over slices of [`Sale`](crate::models::Sale) and
//! [`Product`](crate::models::Product) records: grouping, ranking, calendar
//! windows, and the chart shapes built from them. Nothing here touches the
//! database or the clock directly; time comes in through a [`Calendar`].

pub mod aggregation;
pub mod calendar;
pub mod presentation;
pub mod ranking;
pub mod windows;

pub use aggregation::{
    active_count, average_order_value, group_by_field, group_by_product, inventory_value,
    rank_fields, ratio, sales_count, total_revenue, units_in_stock, FieldSummary,
    ProductSales, ProductSalesSummary, RankedField, SalesField,
};
pub use calendar::{Calendar, Clock, FixedClock, SystemClock, YearMonth};
pub use presentation::{
    breakdown_rows, money, top_products_series, trend_series, truncate_label, BarPoint,
    BreakdownRow, TrendPoint,
};
pub use ranking::{low_stock, top_n, StockStatus};
pub use windows::{current_month_window, monthly_window, today_window, MonthlyBucket, WindowTotals};
