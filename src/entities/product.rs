use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Catalog item row
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub name: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    pub category: String,

    pub material: String,

    /// Optional design/model line used by the shop filters
    #[sea_orm(nullable)]
    pub model: Option<String>,

    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,

    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub weight_grams: Decimal,

    pub stock_quantity: i32,

    pub is_active: bool,

    pub is_featured: bool,

    #[sea_orm(nullable)]
    pub image_url: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sale::Entity")]
    Sales,
    #[sea_orm(has_many = "super::inventory_log::Entity")]
    InventoryLogs,
}

impl Related<super::sale::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl Related<super::inventory_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
