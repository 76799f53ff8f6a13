//! Comparison domain: per-item research fanned out concurrently, then one
//! compile call over the ordered results.

pub mod activities;
pub mod models;

pub use activities::compare;
pub use models::{ComparisonInput, InputError, ItemRecord};
