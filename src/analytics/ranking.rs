use serde::Serialize;
use utoipa::ToSchema;

use super::aggregation::ProductSalesSummary;
use crate::models::Product;

/// Highest-revenue summaries first, at most `n`. Equal revenues keep their input order.
pub fn top_n<I>(summaries: I, n: usize) -> Vec<ProductSalesSummary>
where
    I: IntoIterator<Item = ProductSalesSummary>,
{
    let mut ranked: Vec<ProductSalesSummary> = summaries.into_iter().collect();
    ranked.sort_by(|a, b| b.total_revenue.cmp(&a.total_revenue));
    ranked.truncate(n);
    ranked
}

/// Active products at or below `threshold` units, in input order.
pub fn low_stock(products: &[Product], threshold: u32) -> Vec<&Product> {
    products
        .iter()
        .filter(|p| p.is_active && p.stock_quantity <= threshold)
        .collect()
}

/// Stock level shown in the inventory table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    OutOfStock,
    Low,
    Medium,
    InStock,
}

impl StockStatus {
    pub fn classify(quantity: u32) -> Self {
        match quantity {
            0 => StockStatus::OutOfStock,
            1..=5 => StockStatus::Low,
            6..=10 => StockStatus::Medium,
            _ => StockStatus::InStock,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "Out of Stock",
            StockStatus::Low => "Low Stock",
            StockStatus::Medium => "Medium",
            StockStatus::InStock => "In Stock",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductSnapshot;
    use rstest::rstest;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn summary(name: &str, revenue: Decimal) -> ProductSalesSummary {
        ProductSalesSummary {
            product_id: Uuid::new_v4(),
            product: ProductSnapshot::new(name, Some("Ring"), Some("Gold"), dec!(1)).unwrap(),
            total_sales: 1,
            total_revenue: revenue,
            quantity: 1,
        }
    }

    fn names(ranked: &[ProductSalesSummary]) -> Vec<&str> {
        ranked.iter().map(|s| s.product.name.as_str()).collect()
    }

    #[test]
    fn top_n_orders_by_revenue_and_truncates() {
        let input = vec![
            summary("a", dec!(10)),
            summary("b", dec!(30)),
            summary("c", dec!(20)),
        ];
        assert_eq!(names(&top_n(input.clone(), 2)), ["b", "c"]);
        assert_eq!(top_n(input.clone(), 10).len(), 3);
        assert!(top_n(input, 0).is_empty());
    }

    #[test]
    fn top_n_keeps_input_order_for_ties() {
        let input = vec![
            summary("first", dec!(50)),
            summary("second", dec!(50)),
            summary("third", dec!(50)),
        ];
        assert_eq!(names(&top_n(input, 2)), ["first", "second"]);
    }

    #[test]
    fn top_n_is_idempotent() {
        let input = vec![
            summary("a", dec!(1)),
            summary("b", dec!(3)),
            summary("c", dec!(3)),
            summary("d", dec!(2)),
        ];
        let once = top_n(input, 3);
        assert_eq!(top_n(once.clone(), 3), once);
    }

    #[test]
    fn low_stock_keeps_active_products_at_or_below_threshold() {
        let mut products: Vec<Product> = [0, 5, 6, 10]
            .into_iter()
            .map(|q| Product::new(format!("p{q}"), "Ring", "Gold", dec!(10), q).unwrap())
            .collect();
        products.push(Product::new("hidden", "Ring", "Gold", dec!(10), 1).unwrap().deactivated());

        let low: Vec<&str> = low_stock(&products, 5).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(low, ["p0", "p5"]);
    }

    #[rstest]
    #[case(0, StockStatus::OutOfStock)]
    #[case(1, StockStatus::Low)]
    #[case(5, StockStatus::Low)]
    #[case(6, StockStatus::Medium)]
    #[case(10, StockStatus::Medium)]
    #[case(11, StockStatus::InStock)]
    fn stock_status_thresholds(#[case] quantity: u32, #[case] expected: StockStatus) {
        assert_eq!(StockStatus::classify(quantity), expected);
    }
}
