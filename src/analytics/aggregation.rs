use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Product, ProductSnapshot, Sale};

/// Per-product sales totals
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProductSalesSummary {
    pub product_id: Uuid,
    pub product: ProductSnapshot,
    /// Number of sales referencing the product
    pub total_sales: u64,
    #[schema(value_type = String)]
    pub total_revenue: Decimal,
    /// Units sold
    pub quantity: u64,
}

/// Product summaries keyed by product id, iterated in first-encounter order.
#[derive(Debug, Clone, Default)]
pub struct ProductSales {
    entries: Vec<ProductSalesSummary>,
    index: HashMap<Uuid, usize>,
}

impl ProductSales {
    pub fn get(&self, product_id: &Uuid) -> Option<&ProductSalesSummary> {
        self.index.get(product_id).map(|&slot| &self.entries[slot])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductSalesSummary> {
        self.entries.iter()
    }

    fn slot_for(&mut self, product_id: Uuid, snapshot: &ProductSnapshot) -> usize {
        if let Some(&slot) = self.index.get(&product_id) {
            return slot;
        }
        self.entries.push(ProductSalesSummary {
            product_id,
            product: snapshot.clone(),
            total_sales: 0,
            total_revenue: Decimal::ZERO,
            quantity: 0,
        });
        let slot = self.entries.len() - 1;
        self.index.insert(product_id, slot);
        slot
    }
}

impl IntoIterator for ProductSales {
    type Item = ProductSalesSummary;
    type IntoIter = std::vec::IntoIter<ProductSalesSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Groups sales by product.
///
/// Sales without a product snapshot are skipped. The first snapshot seen for
/// a product id is the one kept on the summary.
pub fn group_by_product(sales: &[Sale]) -> ProductSales {
    let mut grouped = ProductSales::default();
    for sale in sales {
        let Some(snapshot) = sale.product.as_ref() else {
            continue;
        };
        let slot = grouped.slot_for(sale.product_id, snapshot);
        let entry = &mut grouped.entries[slot];
        entry.total_sales += 1;
        entry.total_revenue += sale.total_amount;
        entry.quantity += u64::from(sale.quantity);
    }
    grouped
}

/// Product attribute used to bucket sales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SalesField {
    Category,
    Material,
}

impl SalesField {
    pub fn select<'a>(&self, snapshot: &'a ProductSnapshot) -> Option<&'a str> {
        match self {
            SalesField::Category => snapshot.category.as_deref(),
            SalesField::Material => snapshot.material.as_deref(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SalesField::Category => "category",
            SalesField::Material => "material",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldSummary {
    #[schema(value_type = String)]
    pub revenue: Decimal,
    pub sales: u64,
}

/// Groups sales by category or material. Sales whose field is absent are not counted.
pub fn group_by_field(sales: &[Sale], field: SalesField) -> BTreeMap<String, FieldSummary> {
    let mut grouped: BTreeMap<String, FieldSummary> = BTreeMap::new();
    for sale in sales {
        let Some(value) = sale.product.as_ref().and_then(|p| field.select(p)) else {
            continue;
        };
        let entry = grouped.entry(value.to_string()).or_default();
        entry.revenue += sale.total_amount;
        entry.sales += 1;
    }
    grouped
}

/// A field bucket together with its revenue share of the best bucket
#[derive(Debug, Clone, PartialEq)]
pub struct RankedField {
    pub name: String,
    pub summary: FieldSummary,
    /// `revenue / max revenue`, in `0..=1`
    pub share_of_max: Decimal,
}

/// Orders buckets by revenue, highest first, and attaches each bucket's share
/// of the highest revenue.
pub fn rank_fields(groups: &BTreeMap<String, FieldSummary>) -> Vec<RankedField> {
    let max_revenue = groups
        .values()
        .map(|s| s.revenue)
        .max()
        .unwrap_or(Decimal::ZERO);

    let mut ranked: Vec<RankedField> = groups
        .iter()
        .map(|(name, summary)| RankedField {
            name: name.clone(),
            summary: *summary,
            share_of_max: ratio(summary.revenue, max_revenue),
        })
        .collect();
    ranked.sort_by(|a, b| b.summary.revenue.cmp(&a.summary.revenue));
    ranked
}

/// Division that yields zero for a zero denominator.
pub fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

pub fn total_revenue(sales: &[Sale]) -> Decimal {
    sales.iter().map(|s| s.total_amount).sum()
}

/// Raw number of sales, including those whose product is missing.
pub fn sales_count(sales: &[Sale]) -> u64 {
    sales.len() as u64
}

pub fn average_order_value(sales: &[Sale]) -> Decimal {
    ratio(total_revenue(sales), Decimal::from(sales_count(sales)))
}

/// Stock valued at list price across all products.
pub fn inventory_value(products: &[Product]) -> Decimal {
    products.iter().map(Product::stock_value).sum()
}

pub fn units_in_stock(products: &[Product]) -> u64 {
    products.iter().map(|p| u64::from(p.stock_quantity)).sum()
}

pub fn active_count(products: &[Product]) -> u64 {
    products.iter().filter(|p| p.is_active).count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn snapshot(name: &str, category: Option<&str>, material: Option<&str>) -> ProductSnapshot {
        ProductSnapshot::new(name, category, material, dec!(100)).unwrap()
    }

    fn sale(product_id: Uuid, quantity: i32, total: Decimal, product: Option<ProductSnapshot>) -> Sale {
        let sale = Sale::new(product_id, quantity, total, Utc::now()).unwrap();
        match product {
            Some(p) => sale.with_product(p),
            None => sale,
        }
    }

    #[test]
    fn empty_input_groups_to_nothing() {
        assert!(group_by_product(&[]).is_empty());
        assert!(group_by_field(&[], SalesField::Category).is_empty());
        assert_eq!(total_revenue(&[]), Decimal::ZERO);
        assert_eq!(average_order_value(&[]), Decimal::ZERO);
    }

    #[test]
    fn three_sales_of_one_product_collapse_into_one_summary() {
        let id = Uuid::new_v4();
        let ring = snapshot("Halo Ring", Some("Ring"), Some("Gold"));
        let sales = vec![
            sale(id, 1, dec!(100), Some(ring.clone())),
            sale(id, 2, dec!(50), Some(ring.clone())),
            sale(id, 3, dec!(0), Some(ring)),
        ];

        let grouped = group_by_product(&sales);
        assert_eq!(grouped.len(), 1);
        let summary = grouped.get(&id).unwrap();
        assert_eq!(summary.total_sales, 3);
        assert_eq!(summary.total_revenue, dec!(150));
        assert_eq!(summary.quantity, 6);
    }

    #[test]
    fn sales_without_snapshot_are_skipped_by_groupings_but_counted_raw() {
        let id = Uuid::new_v4();
        let sales = vec![
            sale(id, 1, dec!(80), None),
            sale(Uuid::new_v4(), 1, dec!(20), Some(snapshot("Pearl Studs", Some("Earrings"), Some("Pearl")))),
        ];

        assert!(group_by_product(&sales).get(&id).is_none());
        let by_category = group_by_field(&sales, SalesField::Category);
        assert_eq!(by_category.len(), 1);
        assert_eq!(by_category["Earrings"].revenue, dec!(20));
        assert_eq!(sales_count(&sales), 2);
    }

    #[test]
    fn absent_field_is_excluded_only_from_that_grouping() {
        let sales = vec![sale(
            Uuid::new_v4(),
            1,
            dec!(300),
            Some(snapshot("Tennis Bracelet", None, Some("Silver"))),
        )];
        assert!(group_by_field(&sales, SalesField::Category).is_empty());
        assert_eq!(group_by_field(&sales, SalesField::Material)["Silver"].sales, 1);
    }

    #[test]
    fn field_revenue_sums_to_total_when_nothing_is_missing() {
        let sales = vec![
            sale(Uuid::new_v4(), 1, dec!(10.10), Some(snapshot("A", Some("Ring"), Some("Gold")))),
            sale(Uuid::new_v4(), 1, dec!(20.20), Some(snapshot("B", Some("Chain"), Some("Gold")))),
            sale(Uuid::new_v4(), 1, dec!(0.03), Some(snapshot("C", Some("Ring"), Some("Silver")))),
        ];
        let sum: Decimal = group_by_field(&sales, SalesField::Material)
            .values()
            .map(|s| s.revenue)
            .sum();
        assert_eq!(sum, total_revenue(&sales));
        assert_eq!(sum, dec!(30.33));
    }

    #[test]
    fn ratio_with_zero_denominator_is_zero() {
        assert_eq!(ratio(dec!(5), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(ratio(dec!(5), dec!(2)), dec!(2.5));
    }

    #[test]
    fn rank_fields_orders_by_revenue_and_scales_share() {
        let mut groups = BTreeMap::new();
        groups.insert("Chain".to_string(), FieldSummary { revenue: dec!(50), sales: 1 });
        groups.insert("Ring".to_string(), FieldSummary { revenue: dec!(200), sales: 4 });

        let ranked = rank_fields(&groups);
        assert_eq!(ranked[0].name, "Ring");
        assert_eq!(ranked[0].share_of_max, dec!(1));
        assert_eq!(ranked[1].share_of_max, dec!(0.25));
    }

    #[test]
    fn rank_fields_with_zero_revenue_has_zero_share() {
        let mut groups = BTreeMap::new();
        groups.insert("Anklet".to_string(), FieldSummary { revenue: dec!(0), sales: 2 });
        assert_eq!(rank_fields(&groups)[0].share_of_max, Decimal::ZERO);
    }

    #[test]
    fn inventory_totals() {
        let products = vec![
            Product::new("Locket", "Pendant", "Gold", dec!(250), 2).unwrap(),
            Product::new("Cuff", "Bracelet", "Silver", dec!(80.50), 4).unwrap().deactivated(),
        ];
        assert_eq!(inventory_value(&products), dec!(822.00));
        assert_eq!(units_in_stock(&products), 6);
        assert_eq!(active_count(&products), 1);
    }
}
