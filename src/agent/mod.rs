use std::future::Future;

use futures_util::StreamExt;
use rig::agent::MultiTurnStreamItem;
use rig::message::Message as RigMessage;
use rig::prelude::CompletionClient;
use rig::providers::gemini;
use rig::streaming::{StreamedAssistantContent, StreamingChat};
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::errors::AppError;
use crate::models::{Turn, TurnRole};

/// Everything the remote model needs for one turn.
#[derive(Debug, Clone)]
pub struct AgentRequest {
    pub model: String,
    pub preamble: String,
    /// Prior turns of the session, oldest first.
    pub history: Vec<Turn>,
    pub message: String,
}

/// A model backend that streams one assistant turn.
///
/// Fragments are pushed into `tx` in the order the model produces them.
/// Implementations stop quietly when the receiver goes away.
pub trait ChatAgent: Clone + Send + Sync + 'static {
    fn stream_chat(
        &self,
        request: AgentRequest,
        tx: mpsc::Sender<String>,
    ) -> impl Future<Output = Result<(), AppError>> + Send;
}

/// Builds a rig [`RigMessage`] history list from the session turns.
fn to_rig_history(turns: &[Turn]) -> Vec<RigMessage> {
    turns
        .iter()
        .map(|t| match t.role {
            TurnRole::User => RigMessage::user(&t.text),
            TurnRole::Assistant => RigMessage::assistant(&t.text),
        })
        .collect()
}

/// Maps a provider error onto [`AppError`].
fn classify_error(model: &str, message: String) -> AppError {
    let lower = message.to_lowercase();
    if lower.contains("connection refused") || lower.contains("connect") || lower.contains("dns") {
        AppError::ServiceUnavailable { model: model.to_string() }
    } else {
        AppError::InferenceError { message }
    }
}

/// Streams turns from Gemini through the rig [`gemini::Client`].
/// A fresh agent is built per turn with the session's preamble and model,
/// and the session history is replayed as chat context.
#[derive(Clone)]
pub struct GeminiAgentService {
    client: gemini::Client,
}

impl GeminiAgentService {
    pub fn new(api_key: &str) -> Result<Self, AppError> {
        let client = gemini::Client::builder()
            .api_key(api_key)
            .build()
            .map_err(|e| AppError::ClientInit { message: e.to_string() })?;
        Ok(Self { client })
    }
}

impl ChatAgent for GeminiAgentService {
    async fn stream_chat(
        &self,
        request: AgentRequest,
        tx: mpsc::Sender<String>,
    ) -> Result<(), AppError> {
        let agent = self
            .client
            .agent(&request.model)
            .preamble(&request.preamble)
            .build();

        let history = to_rig_history(&request.history);
        let mut stream = agent.stream_chat(request.message.as_str(), history).await;

        while let Some(item) = stream.next().await {
            match item {
                Ok(MultiTurnStreamItem::StreamAssistantItem(StreamedAssistantContent::Text(text))) => {
                    if tx.send(text.text).await.is_err() {
                        debug!("Fragment receiver dropped, abandoning stream");
                        return Ok(());
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    error!("Gemini streaming failed on model {}: {e}", request.model);
                    return Err(classify_error(&request.model, e.to_string()));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_keeps_turn_order() {
        let turns = vec![
            Turn::user("What is NLP?"),
            Turn::assistant("**NLP** is..."),
            Turn::user("And LLMs?"),
        ];
        let history = to_rig_history(&turns);
        assert_eq!(history.len(), 3);
        assert!(matches!(history[0], RigMessage::User { .. }));
        assert!(matches!(history[1], RigMessage::Assistant { .. }));
        assert!(matches!(history[2], RigMessage::User { .. }));
    }

    #[test]
    fn connection_failures_map_to_unavailable() {
        let err = classify_error("gemini-2.5-flash", "error sending request: Connection refused".into());
        assert!(err.is_agent_unavailable());
    }

    #[test]
    fn other_failures_map_to_inference_error() {
        let err = classify_error("gemini-2.5-flash", "429 quota exhausted".into());
        assert!(matches!(err, AppError::InferenceError { .. }));
    }
}
