use crate::{
    commands::{blank_to_none, find_product, Command, CommandAck, CommandSink, StoreCommand},
    db::DbPool,
    errors::ServiceError,
    models::Product,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Sale as entered on the record-sale form
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RecordSaleCommand {
    pub product_id: Uuid,
    #[validate(length(min = 1, max = 200))]
    pub customer_name: String,
    #[validate(email)]
    pub customer_email: Option<String>,
    #[validate(length(max = 40))]
    pub customer_phone: Option<String>,
    #[validate(range(min = 1))]
    pub quantity: i32,
    #[serde(default)]
    #[schema(value_type = String, example = "25.00")]
    #[validate(custom = "crate::commands::non_negative_amount")]
    pub discount_amount: Decimal,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

/// Fully priced sale handed to the sink
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparedSale {
    pub sale_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub total_amount: Decimal,
    pub notes: Option<String>,
    pub sale_date: DateTime<Utc>,
}

/// `(subtotal, total)` for a sale; the discount may not exceed the subtotal.
pub fn price_sale(
    unit_price: Decimal,
    quantity: u32,
    discount: Decimal,
) -> Result<(Decimal, Decimal), ServiceError> {
    let subtotal = unit_price * Decimal::from(quantity);
    if discount > subtotal {
        return Err(ServiceError::ValidationError(format!(
            "discount_amount: {} exceeds subtotal {}",
            discount, subtotal
        )));
    }
    Ok((subtotal, subtotal - discount))
}

impl RecordSaleCommand {
    pub fn normalized(&self) -> Self {
        Self {
            customer_name: self.customer_name.trim().to_string(),
            customer_email: blank_to_none(&self.customer_email),
            customer_phone: blank_to_none(&self.customer_phone),
            notes: blank_to_none(&self.notes),
            ..self.clone()
        }
    }

    /// Prices the sale against `product` and checks it against current stock
    pub fn prepare(&self, product: &Product, now: DateTime<Utc>) -> Result<PreparedSale, ServiceError> {
        if !product.is_active {
            return Err(ServiceError::InvalidInput(format!(
                "Product {} is not available for sale",
                product.id
            )));
        }

        let quantity = u32::try_from(self.quantity)
            .ok()
            .filter(|q| *q > 0)
            .ok_or_else(|| ServiceError::ValidationError("quantity: must be at least 1".into()))?;
        if quantity > product.stock_quantity {
            warn!(
                product_id = %product.id,
                requested = quantity,
                in_stock = product.stock_quantity,
                "sale exceeds stock"
            );
            return Err(ServiceError::InsufficientStock(format!(
                "requested {} of {} but only {} in stock",
                quantity, product.name, product.stock_quantity
            )));
        }

        let (subtotal, total_amount) = price_sale(product.price, quantity, self.discount_amount)?;

        Ok(PreparedSale {
            sale_id: Uuid::new_v4(),
            product_id: product.id,
            product_name: product.name.clone(),
            customer_name: self.customer_name.clone(),
            customer_email: self.customer_email.clone(),
            customer_phone: self.customer_phone.clone(),
            quantity,
            unit_price: product.price,
            subtotal,
            discount_amount: self.discount_amount,
            total_amount,
            notes: self.notes.clone(),
            sale_date: now,
        })
    }
}

#[async_trait]
impl Command for RecordSaleCommand {
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
        let sale = input.prepare(&product, Utc::now())?;
        sink.submit(StoreCommand::RecordSale(sale)).await
    }
}
