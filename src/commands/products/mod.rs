pub mod add_product_command;

pub use add_product_command::{AddProductCommand, NewProduct};
