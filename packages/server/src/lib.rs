// Shopping Advisor - API Core
//
// Backend for a shopping research assistant: item comparisons, a tool-driven
// chat, and shopping-list recommendations, all backed by a hosted language
// model and a shopping-search provider.
//
// Business logic lives in domains/*/activities; external services sit behind
// the kernel's Base* traits.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
