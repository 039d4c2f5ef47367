//! Back-office write operations.
//!
//! A command validates its input against the current catalog, turns it into a
//! fully priced [`StoreCommand`] and hands that to a [`CommandSink`]. The sink
//! is the only place a write would be persisted.

use crate::{db::DbPool, entities::product, errors::ServiceError, models::Product};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::ValidationError;

pub mod inventory;
pub mod products;
pub mod sales;

pub use inventory::{AdjustStockCommand, PreparedAdjustment, StockDirection};
pub use products::{AddProductCommand, NewProduct};
pub use sales::{PreparedSale, RecordSaleCommand};

/// Command trait for implementing the Command Pattern
#[async_trait]
pub trait Command: Send + Sync {
    /// The return type of the command when executed successfully
    type Result;

    /// Validates against the catalog in `db_pool` and submits to `sink`
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        sink: Arc<dyn CommandSink>,
    ) -> Result<Self::Result, ServiceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    AddProduct,
    RecordSale,
    AdjustStock,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::AddProduct => "add_product",
            CommandKind::RecordSale => "record_sale",
            CommandKind::AdjustStock => "adjust_stock",
        }
    }
}

/// A validated write, ready to persist
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum StoreCommand {
    AddProduct(NewProduct),
    RecordSale(PreparedSale),
    AdjustStock(PreparedAdjustment),
}

impl StoreCommand {
    pub fn kind(&self) -> CommandKind {
        match self {
            StoreCommand::AddProduct(_) => CommandKind::AddProduct,
            StoreCommand::RecordSale(_) => CommandKind::RecordSale,
            StoreCommand::AdjustStock(_) => CommandKind::AdjustStock,
        }
    }
}

/// Receipt for an accepted command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CommandAck {
    pub command_id: Uuid,
    pub kind: CommandKind,
    pub accepted_at: DateTime<Utc>,
}

impl CommandAck {
    fn accept(kind: CommandKind) -> Self {
        Self {
            command_id: Uuid::new_v4(),
            kind,
            accepted_at: Utc::now(),
        }
    }
}

/// Persistence boundary for store writes
#[async_trait]
pub trait CommandSink: Send + Sync {
    async fn submit(&self, command: StoreCommand) -> Result<CommandAck, ServiceError>;
}

/// Logs each command and acknowledges it without storing anything
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingCommandSink;

#[async_trait]
impl CommandSink for LoggingCommandSink {
    async fn submit(&self, command: StoreCommand) -> Result<CommandAck, ServiceError> {
        let kind = command.kind();
        let payload = serde_json::to_string(&command)
            .map_err(|e| ServiceError::InternalError(format!("Failed to encode command: {}", e)))?;
        let ack = CommandAck::accept(kind);

        info!(
            command_id = %ack.command_id,
            kind = kind.as_str(),
            payload = %payload,
            "store command accepted"
        );
        counter!("jewelry_store.commands.submitted", 1, "kind" => kind.as_str());
        Ok(ack)
    }
}

/// Keeps submitted commands in memory, in submission order
#[derive(Debug, Default)]
pub struct RecordingCommandSink {
    submitted: Mutex<Vec<StoreCommand>>,
}

impl RecordingCommandSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn submitted(&self) -> Vec<StoreCommand> {
        self.submitted.lock().await.clone()
    }
}

#[async_trait]
impl CommandSink for RecordingCommandSink {
    async fn submit(&self, command: StoreCommand) -> Result<CommandAck, ServiceError> {
        let ack = CommandAck::accept(command.kind());
        self.submitted.lock().await.push(command);
        Ok(ack)
    }
}

/// Product a command refers to; 404 when it does not exist
pub(crate) async fn find_product(db: &DbPool, id: Uuid) -> Result<Product, ServiceError> {
    let row = product::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Product", id))?;
    Ok(Product::try_from(row)?)
}

/// Blank optional text counts as absent
pub(crate) fn blank_to_none(value: &Option<String>) -> Option<String> {
    value.as_deref().and_then(crate::models::present)
}

pub(crate) fn non_negative_amount(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("must not be negative".into());
        return Err(err);
    }
    Ok(())
}
