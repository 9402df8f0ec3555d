use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::ConversationSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One message exchanged within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Turn {
    pub fn new(role: TurnRole, text: impl Into<String>) -> Self {
        Self { role, text: text.into(), created_at: Utc::now() }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(TurnRole::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(TurnRole::Assistant, text)
    }
}

#[derive(Debug)]
pub struct ChatRequest {
    pub session_id: Option<String>,
    pub message: String,
}

/// WebSocket request sent by the widget for each turn.
#[derive(Debug, Deserialize)]
pub struct WsChatRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    pub message: String,
}

/// WebSocket event sent back while a turn streams.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsEvent {
    StreamStart { session_id: String },
    StreamChunk { content: String },
    StreamEnd { full_content: String },
    Error { message: String },
}

/// Body of `GET /api/status`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub configured: bool,
    pub model: String,
}

/// Body of `GET /api/sessions/{id}`.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub model: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub turns: Vec<Turn>,
}

impl From<ConversationSession> for SessionResponse {
    fn from(s: ConversationSession) -> Self {
        Self {
            id: s.id,
            model: s.config.model,
            created_at: s.created_at,
            updated_at: s.updated_at,
            turns: s.turns,
        }
    }
}
