use thiserror::Error;

/// Failure of a single streamed turn.
///
/// These are recoverable: the controller reports them with the fallback
/// message and the session stays usable for the next submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Model service error: {message}")]
    Service { message: String },

    #[error("Stream closed before the model finished")]
    Interrupted,
}

impl SessionError {
    pub fn transport(message: impl Into<String>) -> Self {
        SessionError::Transport { message: message.into() }
    }

    pub fn service(message: impl Into<String>) -> Self {
        SessionError::Service { message: message.into() }
    }
}

/// Startup failure. Fatal for the widget: it is shown once and nothing
/// else is initialised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{name} is not configured")]
    MissingCredential { name: String },

    #[error("Backend unreachable: {message}")]
    Unreachable { message: String },
}

impl ConfigError {
    /// Text shown in the transcript when initialisation stops.
    pub fn user_message(&self) -> String {
        match self {
            ConfigError::MissingCredential { name } => {
                format!("Error: {name} is not configured. Please set it in your environment.")
            }
            ConfigError::Unreachable { .. } => {
                "Error: the chat service could not be reached. Please reload the page.".to_string()
            }
        }
    }
}
