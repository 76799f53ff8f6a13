pub mod compile;
pub mod item_search;
pub mod pipeline;

pub use compile::compile_comparison;
pub use item_search::search_item;
pub use pipeline::{compare, compare_pair, compare_records, search_and_compile};
