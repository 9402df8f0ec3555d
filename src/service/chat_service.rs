use lexi_core::SessionConfig;
use lexi_core::persona::CREDENTIAL_VAR;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::agent::{AgentRequest, ChatAgent};
use crate::errors::AppError;
use crate::models::{ChatRequest, StatusResponse, Turn};
use crate::session::{ConversationSession, SessionStore};

const MAX_MESSAGE_LENGTH: usize = 8000;

/// A validated turn, ready to be streamed by `agent`.
#[derive(Debug, Clone)]
pub struct TurnContext<A> {
    pub session_id: String,
    pub request: AgentRequest,
    pub agent: A,
}

#[derive(Clone)]
pub struct ChatService<A> {
    store: SessionStore,
    agent: Option<A>,
    config: SessionConfig,
}

impl<A: ChatAgent> ChatService<A> {
    /// `agent` is `None` when no credential was configured; every chat turn
    /// is then refused.
    pub fn new(store: SessionStore, agent: Option<A>, config: SessionConfig) -> Self {
        Self { store, agent, config }
    }

    pub fn status(&self) -> StatusResponse {
        StatusResponse {
            configured: self.agent.is_some(),
            model: self.config.model.clone(),
        }
    }

    pub fn agent(&self) -> Result<&A, AppError> {
        self.agent
            .as_ref()
            .ok_or_else(|| AppError::MissingCredential { name: CREDENTIAL_VAR.to_string() })
    }

    pub async fn get_session(&self, session_id: &str) -> Result<ConversationSession, AppError> {
        self.store
            .find_by_id(session_id)
            .await
            .ok_or_else(|| AppError::SessionNotFound { id: session_id.to_string() })
    }

    /// Validates the message, resolves or creates the session and snapshots
    /// its history. Nothing is recorded until [`Self::save_exchange`].
    pub async fn prepare_chat(&self, request: ChatRequest) -> Result<TurnContext<A>, AppError> {
        let agent = self.agent()?.clone();

        // ── Validation ────────────────────────────────────────────────────────
        let message = request.message.trim();
        if message.is_empty() {
            return Err(AppError::EmptyField { field_name: "message".to_string() });
        }
        if message.len() > MAX_MESSAGE_LENGTH {
            return Err(AppError::FieldTooLong {
                field_name: "message".to_string(),
                max_length: MAX_MESSAGE_LENGTH,
                actual_length: message.len(),
            });
        }

        // ── Resolve or create session ─────────────────────────────────────────
        let session_id = request
            .session_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let session = self.store.get_or_create(&session_id, &self.config).await;
        debug!("Session {session_id} has {} prior turns", session.turns.len());

        Ok(TurnContext {
            session_id,
            request: AgentRequest {
                model: session.config.model,
                preamble: session.config.preamble,
                history: session.turns,
                message: message.to_string(),
            },
            agent,
        })
    }

    /// Commits the user turn and the completed reply. Only called once the
    /// stream finished cleanly, so failed turns leave the history untouched.
    pub async fn save_exchange(&self, ctx: &TurnContext<A>, reply: &str) -> Result<(), AppError> {
        if reply.is_empty() {
            warn!("Model returned an empty reply for session {}", ctx.session_id);
        }
        self.store
            .append_exchange(
                &ctx.session_id,
                Turn::user(ctx.request.message.clone()),
                Turn::assistant(reply),
            )
            .await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::sync::mpsc;

    /// Streams a fixed reply, optionally failing after it.
    #[derive(Debug, Clone, Default)]
    pub(crate) struct ScriptedAgent {
        pub fragments: Vec<String>,
        pub failure: Option<String>,
        pub requests: Arc<Mutex<Vec<AgentRequest>>>,
    }

    impl ScriptedAgent {
        pub(crate) fn replying(fragments: &[&str]) -> Self {
            Self {
                fragments: fragments.iter().map(|f| f.to_string()).collect(),
                ..Self::default()
            }
        }

        pub(crate) fn failing_after(fragments: &[&str], message: &str) -> Self {
            Self { failure: Some(message.to_string()), ..Self::replying(fragments) }
        }
    }

    impl ChatAgent for ScriptedAgent {
        async fn stream_chat(
            &self,
            request: AgentRequest,
            tx: mpsc::Sender<String>,
        ) -> Result<(), AppError> {
            self.requests.lock().unwrap().push(request);
            for fragment in &self.fragments {
                if tx.send(fragment.clone()).await.is_err() {
                    return Ok(());
                }
            }
            match &self.failure {
                Some(message) => Err(AppError::InferenceError { message: message.clone() }),
                None => Ok(()),
            }
        }
    }

    pub(crate) fn service_with(agent: Option<ScriptedAgent>) -> ChatService<ScriptedAgent> {
        ChatService::new(SessionStore::new(), agent, SessionConfig::lexi())
    }

    fn request(session_id: Option<&str>, message: &str) -> ChatRequest {
        ChatRequest {
            session_id: session_id.map(str::to_string),
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn missing_credential_refuses_turns() {
        let svc = service_with(None);
        assert!(!svc.status().configured);

        let err = svc.prepare_chat(request(None, "hi")).await.unwrap_err();
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn blank_and_oversized_messages_are_rejected() {
        let svc = service_with(Some(ScriptedAgent::default()));

        let err = svc.prepare_chat(request(None, "  \n ")).await.unwrap_err();
        assert!(err.is_validation());

        let long = "x".repeat(MAX_MESSAGE_LENGTH + 1);
        let err = svc.prepare_chat(request(None, &long)).await.unwrap_err();
        assert!(matches!(err, AppError::FieldTooLong { actual_length: 8001, .. }));
    }

    #[tokio::test]
    async fn first_turn_creates_session_with_lexi_preamble() {
        let svc = service_with(Some(ScriptedAgent::default()));

        let ctx = svc.prepare_chat(request(None, " What is NLP? ")).await.unwrap();

        assert!(!ctx.session_id.is_empty());
        assert_eq!(ctx.request.message, "What is NLP?");
        assert_eq!(ctx.request.model, "gemini-2.5-flash");
        assert!(ctx.request.preamble.contains("Lexi"));
        assert!(ctx.request.history.is_empty());
        assert!(Arc::ptr_eq(&ctx.agent.requests, &svc.agent().unwrap().requests));
        assert!(svc.get_session(&ctx.session_id).await.unwrap().turns.is_empty());
    }

    #[tokio::test]
    async fn saved_exchange_becomes_history_of_next_turn() {
        let svc = service_with(Some(ScriptedAgent::default()));

        let ctx = svc.prepare_chat(request(None, "What is ML?")).await.unwrap();
        svc.save_exchange(&ctx, "A subset of **AI**.").await.unwrap();

        let next = svc
            .prepare_chat(request(Some(&ctx.session_id), "And DL?"))
            .await
            .unwrap();

        assert_eq!(next.session_id, ctx.session_id);
        let texts: Vec<&str> = next.request.history.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["What is ML?", "A subset of **AI**."]);
    }

    #[tokio::test]
    async fn unsaved_turn_leaves_history_untouched() {
        let svc = service_with(Some(ScriptedAgent::default()));

        let ctx = svc.prepare_chat(request(None, "first")).await.unwrap();
        // stream failed: nothing saved
        let retry = svc
            .prepare_chat(request(Some(&ctx.session_id), "first"))
            .await
            .unwrap();

        assert!(retry.request.history.is_empty());
    }

    #[tokio::test]
    async fn unknown_turns_lookup_is_not_found() {
        let svc = service_with(Some(ScriptedAgent::default()));
        let err = svc.get_session("nope").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
