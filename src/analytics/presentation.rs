//! Chart and table shapes consumed by the admin UI.
//!
//! Money is rounded to cents here and only here; everything upstream works on
//! exact decimals.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use utoipa::ToSchema;

use super::aggregation::{rank_fields, FieldSummary, ProductSalesSummary};
use super::windows::MonthlyBucket;

/// Longest product label shown on the bar chart before it is cut.
pub const LABEL_MAX_CHARS: usize = 15;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TrendPoint {
    pub month: String,
    #[schema(value_type = String, example = "1520.00")]
    pub revenue: Decimal,
    pub sales: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BarPoint {
    pub name: String,
    #[schema(value_type = String)]
    pub revenue: Decimal,
    pub sales: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BreakdownRow {
    pub name: String,
    #[schema(value_type = String)]
    pub revenue: Decimal,
    pub sales: u64,
    /// Revenue relative to the best row, 0 to 100
    #[schema(value_type = String)]
    pub percentage: Decimal,
}

pub fn money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn truncate_label(name: &str) -> String {
    if name.chars().count() <= LABEL_MAX_CHARS {
        return name.to_string();
    }
    let head: String = name.chars().take(LABEL_MAX_CHARS).collect();
    format!("{head}...")
}

pub fn trend_series(buckets: &[MonthlyBucket]) -> Vec<TrendPoint> {
    buckets
        .iter()
        .map(|b| TrendPoint {
            month: b.month_label.clone(),
            revenue: money(b.revenue),
            sales: b.sales_count,
        })
        .collect()
}

pub fn top_products_series(summaries: &[ProductSalesSummary]) -> Vec<BarPoint> {
    summaries
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let name = if s.product.name.trim().is_empty() {
                format!("Product {}", i + 1)
            } else {
                truncate_label(&s.product.name)
            };
            BarPoint {
                name,
                revenue: money(s.total_revenue),
                sales: s.total_sales,
            }
        })
        .collect()
}

pub fn breakdown_rows(groups: &BTreeMap<String, FieldSummary>) -> Vec<BreakdownRow> {
    rank_fields(groups)
        .into_iter()
        .map(|ranked| BreakdownRow {
            name: ranked.name,
            revenue: money(ranked.summary.revenue),
            sales: ranked.summary.sales,
            percentage: money(ranked.share_of_max * Decimal::ONE_HUNDRED),
        })
        .collect()
}
