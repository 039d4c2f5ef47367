use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use tracing::warn;
use uuid::Uuid;

use super::{non_negative_decimal, positive_count, ModelError, ProductSnapshot};
use crate::entities::{product, sale};

/// One completed transaction against a single product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Sale {
    pub id: Uuid,
    pub product_id: Uuid,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub quantity: u32,
    #[schema(value_type = String)]
    pub discount_amount: Decimal,
    #[schema(value_type = String)]
    pub total_amount: Decimal,
    pub sale_date: DateTime<Utc>,
    /// `None` when the referenced product row is missing
    pub product: Option<ProductSnapshot>,
}

impl Sale {
    pub fn new(
        product_id: Uuid,
        quantity: i32,
        total_amount: Decimal,
        sale_date: DateTime<Utc>,
    ) -> Result<Self, ModelError> {
        Ok(Self {
            id: Uuid::new_v4(),
            product_id,
            customer_name: String::new(),
            customer_email: None,
            customer_phone: None,
            quantity: positive_count("quantity", quantity)?,
            discount_amount: Decimal::ZERO,
            total_amount: non_negative_decimal("total_amount", total_amount)?,
            sale_date,
            product: None,
        })
    }

    pub fn with_discount(mut self, discount_amount: Decimal) -> Result<Self, ModelError> {
        self.discount_amount = non_negative_decimal("discount_amount", discount_amount)?;
        Ok(self)
    }

    pub fn with_product(mut self, snapshot: ProductSnapshot) -> Self {
        self.product = Some(snapshot);
        self
    }

    pub fn product_name(&self) -> Option<&str> {
        self.product.as_ref().map(|p| p.name.as_str())
    }
}

impl TryFrom<(sale::Model, Option<product::Model>)> for Sale {
    type Error = ModelError;

    fn try_from((row, product): (sale::Model, Option<product::Model>)) -> Result<Self, Self::Error> {
        let product = product.as_ref().and_then(|p| match ProductSnapshot::try_from(p) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(sale_id = %row.id, product_id = %p.id, error = %e, "ignoring unusable product snapshot");
                None
            }
        });
        Ok(Self {
            id: row.id,
            product_id: row.product_id,
            customer_name: row.customer_name,
            customer_email: row.customer_email,
            customer_phone: row.customer_phone,
            quantity: positive_count("quantity", row.quantity)?,
            discount_amount: non_negative_decimal("discount_amount", row.discount_amount)?,
            total_amount: non_negative_decimal("total_amount", row.total_amount)?,
            sale_date: row.sale_date,
            product,
        })
    }
}
