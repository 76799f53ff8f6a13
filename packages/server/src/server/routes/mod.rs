// HTTP routes
pub mod chat;
pub mod compare;
pub mod health;
pub mod shopping;

pub use chat::*;
pub use compare::*;
pub use health::*;
pub use shopping::*;
