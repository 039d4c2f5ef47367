pub mod adjust_stock_command;

pub use adjust_stock_command::{AdjustStockCommand, PreparedAdjustment, StockDirection};
