use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use super::calendar::{Calendar, YearMonth};
use crate::models::Sale;

/// Revenue and sale count for one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MonthlyBucket {
    pub month_label: String,
    pub year: i32,
    pub month: u32,
    #[schema(value_type = String)]
    pub revenue: Decimal,
    pub sales_count: u64,
}

impl MonthlyBucket {
    fn empty(month: YearMonth) -> Self {
        Self {
            month_label: month.short_label().to_string(),
            year: month.year,
            month: month.month,
            revenue: Decimal::ZERO,
            sales_count: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct WindowTotals {
    #[schema(value_type = String)]
    pub revenue: Decimal,
    pub sales_count: u64,
}

impl WindowTotals {
    fn add(&mut self, sale: &Sale) {
        self.revenue += sale.total_amount;
        self.sales_count += 1;
    }
}

/// Trailing `months_back` calendar months ending with the current one, oldest
/// first. Months without sales are present with zero totals.
pub fn monthly_window(sales: &[Sale], months_back: u32, calendar: &Calendar) -> Vec<MonthlyBucket> {
    let current = calendar.current_month();
    let mut buckets: Vec<MonthlyBucket> = (0..months_back)
        .rev()
        .map(|i| MonthlyBucket::empty(current.months_before(i)))
        .collect();

    for sale in sales {
        let age = calendar.month_of(sale.sale_date).months_until(current);
        if age < 0 || age >= i64::from(months_back) {
            continue;
        }
        let slot = (i64::from(months_back) - 1 - age) as usize;
        let bucket = &mut buckets[slot];
        bucket.revenue += sale.total_amount;
        bucket.sales_count += 1;
    }
    buckets
}

/// Sales whose date, in the reporting zone, is today.
pub fn today_window(sales: &[Sale], calendar: &Calendar) -> WindowTotals {
    let today = calendar.today();
    let mut totals = WindowTotals::default();
    for sale in sales.iter().filter(|s| calendar.local_date(s.sale_date) == today) {
        totals.add(sale);
    }
    totals
}

pub fn current_month_window(sales: &[Sale], calendar: &Calendar) -> WindowTotals {
    let current = calendar.current_month();
    let mut totals = WindowTotals::default();
    for sale in sales.iter().filter(|s| calendar.month_of(s.sale_date) == current) {
        totals.add(sale);
    }
    totals
}
