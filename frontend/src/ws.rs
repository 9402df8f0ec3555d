use std::cell::RefCell;
use std::rc::Rc;

use futures::StreamExt;
use futures::channel::mpsc::{self, UnboundedSender};
use futures::stream;
use lexi_core::{ConversationSession, FragmentStream, SessionError};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{MessageEvent, WebSocket};

use crate::models::{WsChatRequest, WsEvent};

type FragmentSender = UnboundedSender<Result<String, SessionError>>;

/// Conversation session backed by the server's `/ws/chat` endpoint.
///
/// Every turn opens its own socket. The server keeps the history; this side
/// only remembers the session id handed out with the first `stream_start`.
pub struct WsSession {
    url: String,
    session_id: Rc<RefCell<Option<String>>>,
}

impl WsSession {
    pub fn new(url: String) -> Self {
        Self { url, session_id: Rc::new(RefCell::new(None)) }
    }
}

impl ConversationSession for WsSession {
    fn send_streaming(&mut self, text: &str) -> FragmentStream {
        let (tx, rx) = mpsc::unbounded();

        let ws = match WebSocket::new(&self.url) {
            Ok(ws) => ws,
            Err(e) => {
                let err = SessionError::transport(format!("Failed to connect: {e:?}"));
                return stream::iter([Err(err)]).boxed_local();
            }
        };
        ws.set_binary_type(web_sys::BinaryType::Arraybuffer);

        // --- onopen: send the chat request ---
        let request = WsChatRequest {
            message: text.to_string(),
            session_id: self.session_id.borrow().clone(),
        };
        let ws_open = ws.clone();
        let tx_open = tx.clone();
        let onopen = Closure::<dyn Fn()>::new(move || {
            let sent = serde_json::to_string(&request)
                .map_err(|e| format!("Serialize error: {e}"))
                .and_then(|json| {
                    ws_open.send_with_str(&json).map_err(|e| format!("Send failed: {e:?}"))
                });
            if let Err(message) = sent {
                fail(&tx_open, SessionError::transport(message));
                let _ = ws_open.close();
            }
        });
        ws.set_onopen(Some(onopen.as_ref().unchecked_ref()));
        onopen.forget();

        // --- onmessage: dispatch WsEvent ---
        let ws_msg = ws.clone();
        let tx_msg = tx.clone();
        let session_id = self.session_id.clone();
        let onmessage = Closure::<dyn Fn(MessageEvent)>::new(move |ev: MessageEvent| {
            let Some(text) = ev.data().as_string() else {
                return;
            };
            match serde_json::from_str::<WsEvent>(&text) {
                Ok(WsEvent::StreamStart { session_id: id }) => {
                    *session_id.borrow_mut() = Some(id);
                }
                Ok(WsEvent::StreamChunk { content }) => {
                    let _ = tx_msg.unbounded_send(Ok(content));
                }
                Ok(WsEvent::StreamEnd { .. }) => {
                    tx_msg.close_channel();
                    let _ = ws_msg.close();
                }
                Ok(WsEvent::Error { message }) => {
                    fail(&tx_msg, SessionError::service(message));
                    let _ = ws_msg.close();
                }
                Err(e) => {
                    fail(&tx_msg, SessionError::transport(format!("Parse error: {e}")));
                    let _ = ws_msg.close();
                }
            }
        });
        ws.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
        onmessage.forget();

        // --- onerror ---
        let tx_err = tx.clone();
        let onerror = Closure::<dyn Fn()>::new(move || {
            log::error!("WebSocket connection error");
            fail(&tx_err, SessionError::transport("WebSocket connection error"));
        });
        ws.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onerror.forget();

        // --- onclose: a close before stream_end cuts the turn short ---
        let onclose = Closure::<dyn Fn()>::new(move || {
            if !tx.is_closed() {
                fail(&tx, SessionError::Interrupted);
            }
        });
        ws.set_onclose(Some(onclose.as_ref().unchecked_ref()));
        onclose.forget();

        rx.boxed_local()
    }
}

/// Ends the fragment stream with `err`. Later events are dropped.
fn fail(tx: &FragmentSender, err: SessionError) {
    if !tx.is_closed() {
        let _ = tx.unbounded_send(Err(err));
        tx.close_channel();
    }
}
