//! Chat domain: one tool-driven turn per user message.

pub mod activities;
pub mod conversation;
pub mod envelope;
pub mod tools;

pub use activities::chat_turn;
pub use conversation::ConversationStore;
pub use envelope::{Recommendation, Source, ToolEnvelope};
pub use tools::{ChatTool, ToolCatalog};
