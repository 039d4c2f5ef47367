//! Loading of domain records for reports and listings.
//!
//! Rows that fail validation are logged and dropped so one bad row never
//! poisons a whole report.

use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, QuerySelect};
use tracing::warn;

use crate::entities::{inventory_log, product, sale};
use crate::errors::ServiceError;
use crate::models::{InventoryLog, Product, Sale};

pub(crate) fn valid_products(rows: Vec<product::Model>) -> Vec<Product> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id;
            match Product::try_from(row) {
                Ok(product) => Some(product),
                Err(e) => {
                    warn!(product_id = %id, error = %e, "skipping invalid product row");
                    None
                }
            }
        })
        .collect()
}

pub(crate) fn valid_sales(rows: Vec<(sale::Model, Option<product::Model>)>) -> Vec<Sale> {
    rows.into_iter()
        .filter_map(|pair| {
            let id = pair.0.id;
            match Sale::try_from(pair) {
                Ok(sale) => Some(sale),
                Err(e) => {
                    warn!(sale_id = %id, error = %e, "skipping invalid sale row");
                    None
                }
            }
        })
        .collect()
}

/// All products, newest first
pub async fn load_products(db: &DatabaseConnection) -> Result<Vec<Product>, ServiceError> {
    let rows = product::Entity::find()
        .order_by_desc(product::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(valid_products(rows))
}

/// All sales joined with their product, newest first
pub async fn load_sales(db: &DatabaseConnection) -> Result<Vec<Sale>, ServiceError> {
    let rows = sale::Entity::find()
        .find_also_related(product::Entity)
        .order_by_desc(sale::Column::SaleDate)
        .all(db)
        .await?;
    Ok(valid_sales(rows))
}

pub async fn recent_inventory_logs(
    db: &DatabaseConnection,
    limit: u64,
) -> Result<Vec<InventoryLog>, ServiceError> {
    let rows = inventory_log::Entity::find()
        .find_also_related(product::Entity)
        .order_by_desc(inventory_log::Column::CreatedAt)
        .limit(limit)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(InventoryLog::from).collect())
}
