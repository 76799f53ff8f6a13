// Business domains
pub mod chat;
pub mod compare;
pub mod products;
pub mod shopping;
