use std::future::Future;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::agent::ChatAgent;
use crate::errors::AppError;
use crate::models::{ChatRequest, WsChatRequest, WsEvent};
use crate::service::chat_service::ChatService;

const FRAGMENT_BUFFER: usize = 64;

/// Destination for the events of one streamed turn.
///
/// An `Err` means the client is gone and nothing further will reach it.
pub trait EventSink: Send {
    fn send_event(&mut self, event: WsEvent) -> impl Future<Output = Result<(), AppError>> + Send;
}

impl EventSink for WebSocket {
    async fn send_event(&mut self, event: WsEvent) -> Result<(), AppError> {
        let json = match serde_json::to_string(&event) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize event: {e}");
                return Ok(());
            }
        };
        self.send(Message::Text(json.into()))
            .await
            .map_err(|e| AppError::ClientGone { message: e.to_string() })
    }
}

/// GET `/ws/chat`: upgrades to a WebSocket for streaming chat.
pub async fn ws_chat_handler<A: ChatAgent>(
    ws: WebSocketUpgrade,
    State(svc): State<ChatService<A>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, svc))
}

/// Handles a single WebSocket connection.
///
/// Protocol:
/// - Client sends JSON `{ "session_id": "...|null", "message": "..." }`
/// - Server streams back:
///   1. `{ "type": "stream_start", "session_id": "..." }`
///   2. `{ "type": "stream_chunk", "content": "..." }` (repeated)
///   3. `{ "type": "stream_end", "full_content": "..." }`
///   or `{ "type": "error", "message": "..." }` on failure.
async fn handle_socket<A: ChatAgent>(mut socket: WebSocket, svc: ChatService<A>) {
    info!("WebSocket client connected");

    while let Some(msg) = socket.recv().await {
        let msg = match msg {
            Ok(m) => m,
            Err(e) => {
                warn!("WebSocket receive error: {e}");
                break;
            }
        };

        // Only handle text messages
        let text = match &msg {
            Message::Text(t) => t.to_string(),
            Message::Close(_) => break,
            _ => continue,
        };

        let ws_req: WsChatRequest = match serde_json::from_str(&text) {
            Ok(r) => r,
            Err(e) => {
                let event = WsEvent::Error { message: format!("Invalid request: {e}") };
                if socket.send_event(event).await.is_err() {
                    break;
                }
                continue;
            }
        };

        run_turn(&svc, ws_req, &mut socket).await;
    }

    info!("WebSocket client disconnected");
}

/// Streams one turn into `sink`, committing it to the session only when the
/// model finished without error and the client received every event.
pub async fn run_turn<A: ChatAgent, S: EventSink>(
    svc: &ChatService<A>,
    ws_req: WsChatRequest,
    sink: &mut S,
) {
    let chat_request = ChatRequest {
        session_id: ws_req.session_id,
        message: ws_req.message,
    };

    // ── Prepare: validate, resolve session, snapshot history ─────────────
    let ctx = match svc.prepare_chat(chat_request).await {
        Ok(ctx) => ctx,
        Err(e) => {
            warn!("Rejected chat turn: {e}");
            let _ = sink.send_event(WsEvent::Error { message: e.to_string() }).await;
            return;
        }
    };

    let start = WsEvent::StreamStart { session_id: ctx.session_id.clone() };
    if let Err(e) = sink.send_event(start).await {
        warn!("Dropping turn for session {}: {e}", ctx.session_id);
        return;
    }

    // ── Stream fragments from the model via a channel ────────────────────
    let (tx, mut rx) = mpsc::channel::<String>(FRAGMENT_BUFFER);
    let agent = ctx.agent.clone();
    let request = ctx.request.clone();
    let stream_handle = tokio::spawn(async move { agent.stream_chat(request, tx).await });

    let mut full_content = String::new();
    while let Some(chunk) = rx.recv().await {
        full_content.push_str(&chunk);
        if let Err(e) = sink.send_event(WsEvent::StreamChunk { content: chunk }).await {
            // Closing the channel makes the agent stop; the turn is not kept.
            warn!("Dropping turn for session {}: {e}", ctx.session_id);
            drop(rx);
            return;
        }
    }

    match stream_handle.await {
        Ok(Ok(())) => {
            let end = WsEvent::StreamEnd { full_content: full_content.clone() };
            if let Err(e) = sink.send_event(end).await {
                warn!("Dropping turn for session {}: {e}", ctx.session_id);
                return;
            }
            if let Err(e) = svc.save_exchange(&ctx, &full_content).await {
                error!("Failed to record exchange for session {}: {e}", ctx.session_id);
            }
        }
        Ok(Err(e)) => {
            error!("Agent streaming failed for session {}: {e}", ctx.session_id);
            let _ = sink.send_event(WsEvent::Error { message: e.to_string() }).await;
        }
        Err(e) => {
            error!("Agent task panicked: {e}");
            let _ = sink
                .send_event(WsEvent::Error {
                    message: "Internal error during streaming".to_string(),
                })
                .await;
        }
    }
}
