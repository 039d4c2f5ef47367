use crate::{
    commands::{find_product, Command, CommandAck, CommandSink, StoreCommand},
    db::DbPool,
    errors::ServiceError,
    models::Product,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StockDirection {
    Add,
    Remove,
}

/// Manual stock correction
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AdjustStockCommand {
    pub product_id: Uuid,
    pub direction: StockDirection,
    #[validate(range(min = 1))]
    pub quantity: i32,
    #[validate(length(min = 1, max = 200))]
    pub reason: String,
}

/// Inventory log entry handed to the sink
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparedAdjustment {
    pub product_id: Uuid,
    pub product_name: String,
    /// Positive when adding stock
    pub quantity_change: i32,
    pub change_reason: String,
    pub previous_stock: u32,
    pub resulting_stock: u32,
    pub requested_at: DateTime<Utc>,
}

impl AdjustStockCommand {
    pub fn normalized(&self) -> Self {
        Self {
            reason: self.reason.trim().to_string(),
            ..self.clone()
        }
    }

    pub fn signed_change(&self) -> i32 {
        match self.direction {
            StockDirection::Add => self.quantity,
            StockDirection::Remove => -self.quantity,
        }
    }

    pub fn prepare(
        &self,
        product: &Product,
        now: DateTime<Utc>,
    ) -> Result<PreparedAdjustment, ServiceError> {
        let change = self.signed_change();
        let resulting = i64::from(product.stock_quantity) + i64::from(change);
        let resulting_stock = u32::try_from(resulting).map_err(|_| {
            ServiceError::InsufficientStock(format!(
                "cannot remove {} of {}; only {} in stock",
                self.quantity, product.name, product.stock_quantity
            ))
        })?;

        Ok(PreparedAdjustment {
            product_id: product.id,
            product_name: product.name.clone(),
            quantity_change: change,
            change_reason: self.reason.clone(),
            previous_stock: product.stock_quantity,
            resulting_stock,
            requested_at: now,
        })
    }
}

#[async_trait]
impl Command for AdjustStockCommand {
    type Result = CommandAck;

    #[instrument(skip(self, db_pool, sink), fields(product_id = %self.product_id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        sink: Arc<dyn CommandSink>,
    ) -> Result<Self::Result, ServiceError> {
        let input = self.normalized();
        input.validate()?;
        let product = find_product(&db_pool, input.product_id).await?;
        let adjustment = input.prepare(&product, Utc::now())?;
        sink.submit(StoreCommand::AdjustStock(adjustment)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    fn brooch(stock: i32) -> Product {
        Product::new("Cameo Brooch", "Brooch", "Gold", dec!(210), stock).unwrap()
    }

    fn adjust(product_id: Uuid, direction: StockDirection, quantity: i32) -> AdjustStockCommand {
        AdjustStockCommand {
            product_id,
            direction,
            quantity,
            reason: " cycle count ".into(),
        }
    }

    #[test]
    fn add_and_remove_sign_the_change() {
        let product = brooch(4);
        let added = adjust(product.id, StockDirection::Add, 3)
            .normalized()
            .prepare(&product, Utc::now())
            .unwrap();
        assert_eq!(added.quantity_change, 3);
        assert_eq!(added.resulting_stock, 7);
        assert_eq!(added.change_reason, "cycle count");

        let removed = adjust(product.id, StockDirection::Remove, 4)
            .prepare(&product, Utc::now())
            .unwrap();
        assert_eq!(removed.quantity_change, -4);
        assert_eq!(removed.resulting_stock, 0);
    }

    #[test]
    fn removing_more_than_stock_is_rejected() {
        let product = brooch(1);
        assert_matches!(
            adjust(product.id, StockDirection::Remove, 2).prepare(&product, Utc::now()),
            Err(ServiceError::InsufficientStock(_))
        );
    }

    #[test]
    fn blank_reason_and_zero_quantity_fail_validation() {
        let mut input = adjust(Uuid::new_v4(), StockDirection::Add, 0);
        input.reason = "  ".into();
        let errors = input.normalized().validate().unwrap_err();
        assert!(errors.field_errors().contains_key("quantity"));
        assert!(errors.field_errors().contains_key("reason"));
    }

    #[test]
    fn direction_parses_lowercase() {
        let parsed: StockDirection = serde_json::from_str("\"remove\"").unwrap();
        assert_eq!(parsed, StockDirection::Remove);
    }
}
