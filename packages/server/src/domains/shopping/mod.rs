//! Shopping-list advisor domain.

pub mod activities;
pub mod models;
pub mod parsing;
pub mod pricing;

pub use activities::{recommend_items, recommend_next_item};
pub use models::{ItemRef, ShoppingItem};
pub use pricing::{format_price, PRICE_NA, PRICE_NOT_AVAILABLE};
