//! HTTP handlers for the storefront and back office.

pub mod admin;
pub mod common;
pub mod products;

pub use crate::AppState;
