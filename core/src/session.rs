use futures::stream::LocalBoxStream;

use crate::error::SessionError;
use crate::persona;

/// Text fragments of one assistant turn, in arrival order.
///
/// Forward-only and finite. Dropping the stream abandons the turn.
pub type FragmentStream = LocalBoxStream<'static, Result<String, SessionError>>;

/// A multi-turn conversation with the remote model.
///
/// Prior turns are kept by the implementation; callers only hand over the
/// next user message. A stream that ends in an error must not break the
/// session for later calls.
pub trait ConversationSession {
    /// Starts one round trip for `text`. Each call yields a fresh stream.
    fn send_streaming(&mut self, text: &str) -> FragmentStream;
}

/// What a session is bound to when it is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub preamble: String,
    pub model: String,
}

impl SessionConfig {
    pub fn new(preamble: impl Into<String>, model: impl Into<String>) -> Self {
        Self { preamble: preamble.into(), model: model.into() }
    }

    /// The Lexi persona on the default model.
    pub fn lexi() -> Self {
        Self::new(persona::PREAMBLE, persona::DEFAULT_MODEL)
    }

    /// Same preamble, different model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::lexi()
    }
}
