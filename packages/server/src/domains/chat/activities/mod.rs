pub mod respond;

pub use respond::{chat_turn, resolve_envelope, FALLBACK_REASONING};
