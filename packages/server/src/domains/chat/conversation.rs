//! Per-session chat history held in memory.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use openai_client::Message;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Messages kept per session.
pub const DEFAULT_MAX_MESSAGES: usize = 50;

/// Sessions untouched for this long are dropped.
pub const DEFAULT_IDLE_HOURS: i64 = 24;

struct Session {
    messages: Vec<Message>,
    last_seen: DateTime<Utc>,
}

pub struct ConversationStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
    max_messages: usize,
    idle_ttl: Duration,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_MAX_MESSAGES, Duration::hours(DEFAULT_IDLE_HOURS))
    }

    pub fn with_limits(max_messages: usize, idle_ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_messages,
            idle_ttl,
        }
    }

    /// History for `session`, oldest first. Unknown or expired sessions are empty.
    pub async fn history(&self, session: Uuid) -> Vec<Message> {
        let sessions = self.sessions.read().await;
        match sessions.get(&session) {
            Some(s) if !self.is_expired(s, Utc::now()) => s.messages.clone(),
            _ => Vec::new(),
        }
    }

    /// Record one completed turn, trimming to the newest messages.
    pub async fn append_turn(&self, session: Uuid, user: Message, assistant: Message) {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;

        let before = sessions.len();
        sessions.retain(|id, s| *id == session || !self.is_expired(s, now));
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::debug!(evicted, "Evicted idle chat sessions");
        }

        let entry = sessions.entry(session).or_insert_with(|| Session {
            messages: Vec::new(),
            last_seen: now,
        });
        if self.is_expired(entry, now) {
            entry.messages.clear();
        }

        entry.messages.push(user);
        entry.messages.push(assistant);
        if entry.messages.len() > self.max_messages {
            let excess = entry.messages.len() - self.max_messages;
            entry.messages.drain(..excess);
        }
        entry.last_seen = now;
    }

    /// Forget everything said in `session`.
    pub async fn reset(&self, session: Uuid) -> bool {
        self.sessions.write().await.remove(&session).is_some()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn is_expired(&self, session: &Session, now: DateTime<Utc>) -> bool {
        now - session.last_seen > self.idle_ttl
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_turns_accumulate_in_order() {
        let store = ConversationStore::new();
        let id = Uuid::new_v4();

        store
            .append_turn(id, Message::user("hi"), Message::assistant("{\"type\":\"noop\"}"))
            .await;
        store
            .append_turn(id, Message::user("laptop"), Message::assistant("{}"))
            .await;

        let history = store.history(id).await;
        let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["hi", "{\"type\":\"noop\"}", "laptop", "{}"]);
        assert_eq!(history[0].role, "user");
        assert_eq!(history[1].role, "assistant");
    }

    #[tokio::test]
    async fn test_sessions_are_isolated_and_resettable() {
        let store = ConversationStore::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        store.append_turn(a, Message::user("a"), Message::assistant("x")).await;
        assert!(store.history(b).await.is_empty());

        assert!(store.reset(a).await);
        assert!(store.history(a).await.is_empty());
        assert!(!store.reset(a).await);
    }

    #[tokio::test]
    async fn test_history_is_capped() {
        let store = ConversationStore::with_limits(4, Duration::hours(1));
        let id = Uuid::new_v4();

        for i in 0..3 {
            store
                .append_turn(id, Message::user(format!("u{}", i)), Message::assistant(format!("a{}", i)))
                .await;
        }

        let contents: Vec<String> = store.history(id).await.into_iter().map(|m| m.content).collect();
        assert_eq!(contents, vec!["u1", "a1", "u2", "a2"]);
    }

    #[tokio::test]
    async fn test_idle_sessions_expire() {
        let store = ConversationStore::with_limits(10, Duration::zero());
        let (old, new) = (Uuid::new_v4(), Uuid::new_v4());

        store.append_turn(old, Message::user("a"), Message::assistant("b")).await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        assert!(store.history(old).await.is_empty());
        store.append_turn(new, Message::user("c"), Message::assistant("d")).await;
        assert_eq!(store.session_count().await, 1);
    }
}
