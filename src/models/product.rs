use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{non_negative_count, non_negative_decimal, present, required_text, ModelError};
use crate::entities::product;

/// Catalog item as consumed by the storefront and reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub material: String,
    pub model: Option<String>,
    #[schema(value_type = String, example = "1299.00")]
    pub price: Decimal,
    #[schema(value_type = String, example = "4.5")]
    pub weight_grams: Decimal,
    pub stock_quantity: u32,
    pub is_active: bool,
    pub is_featured: bool,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Creates an active, non-featured product with the given pricing and stock.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        material: impl Into<String>,
        price: Decimal,
        stock_quantity: i32,
    ) -> Result<Self, ModelError> {
        Ok(Self {
            id: Uuid::new_v4(),
            name: required_text("name", name.into())?,
            description: None,
            category: category.into(),
            material: material.into(),
            model: None,
            price: non_negative_decimal("price", price)?,
            weight_grams: Decimal::ZERO,
            stock_quantity: non_negative_count("stock_quantity", stock_quantity)?,
            is_active: true,
            is_featured: false,
            image_url: None,
            created_at: Utc::now(),
        })
    }

    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Stock valued at list price.
    pub fn stock_value(&self) -> Decimal {
        self.price * Decimal::from(self.stock_quantity)
    }

    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            name: self.name.clone(),
            category: present(&self.category),
            material: present(&self.material),
            price: self.price,
        }
    }
}

impl TryFrom<product::Model> for Product {
    type Error = ModelError;

    fn try_from(row: product::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            name: required_text("name", row.name)?,
            description: row.description.as_deref().and_then(present),
            category: row.category,
            material: row.material,
            model: row.model.as_deref().and_then(present),
            price: non_negative_decimal("price", row.price)?,
            weight_grams: non_negative_decimal("weight_grams", row.weight_grams)?,
            stock_quantity: non_negative_count("stock_quantity", row.stock_quantity)?,
            is_active: row.is_active,
            is_featured: row.is_featured,
            image_url: row.image_url.as_deref().and_then(present),
            created_at: row.created_at,
        })
    }
}

/// Denormalized product fields carried alongside a sale.
///
/// `category` and `material` are optional: a sale whose snapshot lacks the
/// field is left out of the matching breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductSnapshot {
    pub name: String,
    pub category: Option<String>,
    pub material: Option<String>,
    #[schema(value_type = String)]
    pub price: Decimal,
}

impl ProductSnapshot {
    pub fn new(
        name: impl Into<String>,
        category: Option<&str>,
        material: Option<&str>,
        price: Decimal,
    ) -> Result<Self, ModelError> {
        Ok(Self {
            name: name.into(),
            category: category.and_then(present),
            material: material.and_then(present),
            price: non_negative_decimal("price", price)?,
        })
    }
}

impl TryFrom<&product::Model> for ProductSnapshot {
    type Error = ModelError;

    fn try_from(row: &product::Model) -> Result<Self, Self::Error> {
        Self::new(
            row.name.clone(),
            Some(row.category.as_str()),
            Some(row.material.as_str()),
            row.price,
        )
    }
}
