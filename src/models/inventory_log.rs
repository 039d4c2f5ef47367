use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{inventory_log, product};

/// Stock change entry, listed with the product name when the product exists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct InventoryLog {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: Option<String>,
    pub quantity_change: i32,
    pub change_reason: String,
    pub created_at: DateTime<Utc>,
}

impl InventoryLog {
    pub fn is_addition(&self) -> bool {
        self.quantity_change > 0
    }
}

impl From<(inventory_log::Model, Option<product::Model>)> for InventoryLog {
    fn from((row, product): (inventory_log::Model, Option<product::Model>)) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            product_name: product.map(|p| p.name),
            quantity_change: row.quantity_change,
            change_reason: row.change_reason,
            created_at: row.created_at,
        }
    }
}
