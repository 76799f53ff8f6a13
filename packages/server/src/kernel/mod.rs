//! Kernel module - server infrastructure and dependencies.

pub mod ai;
pub mod cache;
pub mod deps;
pub mod product_search;
pub mod prompts;
pub mod test_dependencies;
pub mod traits;

pub use ai::OpenAIModel;
pub use cache::{CachePolicy, MemoCache};
pub use deps::{Features, ServerDeps};
pub use product_search::{NoopProductSearch, SerpApiProductSearch};
pub use prompts::Prompts;
pub use test_dependencies::TestDependencies;
pub use traits::*;
