pub mod record_sale_command;

pub use record_sale_command::{PreparedSale, RecordSaleCommand};
