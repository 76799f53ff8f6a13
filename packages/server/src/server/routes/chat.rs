use axum::{extract::Extension, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use axum_extra::extract::WithRejection;
use openai_client::Message;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domains::chat::chat_turn;
use crate::server::app::AppState;
use crate::server::error::ApiError;

/// Cookie carrying the conversation id.
pub const SESSION_COOKIE: &str = "session_id";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub user_input: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    /// The envelope as a JSON string
    pub response: String,
}

fn session_id(jar: &CookieJar) -> Option<Uuid> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

fn issue_session(jar: CookieJar) -> (CookieJar, Uuid) {
    let id = Uuid::new_v4();
    let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true);
    (jar.add(cookie), id)
}

/// One chat turn against the caller's server-held history.
pub async fn get_response_handler(
    Extension(state): Extension<AppState>,
    jar: CookieJar,
    WithRejection(Json(request), _): WithRejection<Json<ChatRequest>, ApiError>,
) -> Result<(CookieJar, Json<ChatReply>), ApiError> {
    let message = request.user_input.unwrap_or_default();
    if message.trim().is_empty() {
        return Err(ApiError::BadRequest("Please provide a message.".to_string()));
    }

    let (jar, session) = match session_id(&jar) {
        Some(id) => (jar, id),
        None => issue_session(jar),
    };

    let history = state.conversations.history(session).await;
    let envelope = chat_turn(&message, &history, &state.catalog, &state.deps)
        .await
        .map_err(|e| {
            tracing::error!(error = ?e, %session, "Chat turn failed");
            ApiError::unexpected()
        })?;

    let response = envelope.to_json_string();
    state
        .conversations
        .append_turn(session, Message::user(message), Message::assistant(response.clone()))
        .await;

    Ok((jar, Json(ChatReply { response })))
}

/// Clear the caller's conversation history.
pub async fn reset_handler(
    Extension(state): Extension<AppState>,
    jar: CookieJar,
) -> Json<serde_json::Value> {
    if let Some(session) = session_id(&jar) {
        let existed = state.conversations.reset(session).await;
        tracing::debug!(%session, existed, "Conversation reset");
    }
    Json(serde_json::json!({ "status": "reset" }))
}
