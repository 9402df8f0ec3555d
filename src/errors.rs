use thiserror::Error;

/// Top-level backend error.
/// All variants carry a human-readable message for display/logging.
#[derive(Debug, Error)]
pub enum AppError {
    // ── Configuration errors ─────────────────────────────────────────────────
    #[error("{name} is not configured")]
    MissingCredential { name: String },

    #[error("Failed to build model client: {message}")]
    ClientInit { message: String },

    // ── AI Agent errors ──────────────────────────────────────────────────────
    #[error("Model service unavailable for '{model}'")]
    ServiceUnavailable { model: String },

    #[error("Inference error: {message}")]
    InferenceError { message: String },

    // ── Validation errors ────────────────────────────────────────────────────
    #[error("Field '{field_name}' cannot be empty")]
    EmptyField { field_name: String },

    #[error("Field '{field_name}' exceeds max length of {max_length} (actual: {actual_length})")]
    FieldTooLong { field_name: String, max_length: usize, actual_length: usize },

    // ── Session errors ───────────────────────────────────────────────────────
    #[error("Session '{id}' not found")]
    SessionNotFound { id: String },

    // ── Transport errors ─────────────────────────────────────────────────────
    #[error("Client disconnected: {message}")]
    ClientGone { message: String },
}

impl AppError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::SessionNotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::EmptyField { .. } | AppError::FieldTooLong { .. })
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, AppError::MissingCredential { .. } | AppError::ClientInit { .. })
    }

    pub fn is_agent_unavailable(&self) -> bool {
        matches!(self, AppError::ServiceUnavailable { .. })
    }
}
