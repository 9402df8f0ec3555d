use serde::{Deserialize, Serialize};

/// Response of `GET /api/status`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct StatusResponse {
    pub configured: bool,
    pub model: String,
}

/// WebSocket request sent for every turn.
#[derive(Clone, Debug, Serialize)]
pub struct WsChatRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// WebSocket event received from the server.
/// Matches the backend `WsEvent` enum (internally tagged).
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsEvent {
    StreamStart { session_id: String },
    StreamChunk { content: String },
    StreamEnd {
        #[serde(default)]
        full_content: String,
    },
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_server_events() {
        let chunk: WsEvent =
            serde_json::from_str(r#"{"type":"stream_chunk","content":"**Hi"}"#).unwrap();
        assert_eq!(chunk, WsEvent::StreamChunk { content: "**Hi".into() });

        let end: WsEvent = serde_json::from_str(r#"{"type":"stream_end"}"#).unwrap();
        assert_eq!(end, WsEvent::StreamEnd { full_content: String::new() });
    }

    #[test]
    fn first_request_omits_session_id() {
        let req = WsChatRequest { message: "What is NLP?".into(), session_id: None };
        assert_eq!(serde_json::to_string(&req).unwrap(), r#"{"message":"What is NLP?"}"#);
    }
}
