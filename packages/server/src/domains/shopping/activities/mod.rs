pub mod recommend;

pub use recommend::{recommend_items, recommend_next_item};
