use gloo_net::http::Request;

use crate::models::StatusResponse;

/// Base URL of the backend API server.
const API_BASE: &str = "http://localhost:3000";

/// Asks the backend whether the model credential is configured.
pub async fn fetch_status() -> Result<StatusResponse, String> {
    let resp = Request::get(&format!("{API_BASE}/api/status"))
        .send()
        .await
        .map_err(|e| format!("Network error: {e}"))?;

    if !resp.ok() {
        return Err(format!("Server error: {}", resp.status()));
    }

    resp.json::<StatusResponse>()
        .await
        .map_err(|e| format!("Parse error: {e}"))
}

/// Returns the WebSocket URL for the chat streaming endpoint.
pub fn ws_url() -> String {
    API_BASE.replacen("http", "ws", 1) + "/ws/chat"
}
