use crate::{
    commands::{blank_to_none, Command, CommandAck, CommandSink, StoreCommand},
    db::DbPool,
    errors::ServiceError,
    models::{present, ModelError},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// New catalog item as entered on the add-product form
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AddProductCommand {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(length(min = 1, max = 100))]
    pub material: String,
    #[validate(length(max = 100))]
    pub model: Option<String>,
    #[schema(value_type = String, example = "899.00")]
    #[validate(custom = "crate::commands::non_negative_amount")]
    pub price: Decimal,
    #[serde(default)]
    #[schema(value_type = String, example = "3.5")]
    #[validate(custom = "crate::commands::non_negative_amount")]
    pub weight_grams: Decimal,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub stock_quantity: i32,
    #[validate(url)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
}

/// Product payload handed to the sink
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProduct {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub material: String,
    pub model: Option<String>,
    pub price: Decimal,
    pub weight_grams: Decimal,
    pub stock_quantity: u32,
    pub image_url: Option<String>,
    pub is_featured: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

fn required(field: &'static str, value: &str) -> Result<String, ModelError> {
    present(value).ok_or(ModelError::MissingField(field))
}

impl AddProductCommand {
    /// Trims text and drops blank optional fields
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: blank_to_none(&self.description),
            category: self.category.trim().to_string(),
            material: self.material.trim().to_string(),
            model: blank_to_none(&self.model),
            image_url: blank_to_none(&self.image_url),
            ..self.clone()
        }
    }

    pub fn prepare(&self, now: DateTime<Utc>) -> Result<NewProduct, ServiceError> {
        Ok(NewProduct {
            id: Uuid::new_v4(),
            name: required("name", &self.name)?,
            description: self.description.clone(),
            category: required("category", &self.category)?,
            material: required("material", &self.material)?,
            model: self.model.clone(),
            price: self.price,
            weight_grams: self.weight_grams,
            stock_quantity: u32::try_from(self.stock_quantity).map_err(|_| {
                ModelError::InvalidNumeric {
                    field: "stock_quantity",
                    value: self.stock_quantity.to_string(),
                }
            })?,
            image_url: self.image_url.clone(),
            is_featured: self.is_featured,
            is_active: true,
            created_at: now,
        })
    }
}

#[async_trait]
impl Command for AddProductCommand {
    type Result = CommandAck;

    #[instrument(skip(self, _db_pool, sink), fields(name = %self.name))]
    async fn execute(
        &self,
        _db_pool: Arc<DbPool>,
        sink: Arc<dyn CommandSink>,
    ) -> Result<Self::Result, ServiceError> {
        let input = self.normalized();
        input.validate()?;
        let product = input.prepare(Utc::now())?;
        sink.submit(StoreCommand::AddProduct(product)).await
    }
}
