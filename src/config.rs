use std::path::PathBuf;

use lexi_core::persona::{CREDENTIAL_VAR, DEFAULT_MODEL};

use crate::session::DEFAULT_IDLE_MINUTES;

const DEFAULT_PORT: u16 = 3000;

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Model service credential. `None` leaves the server up but unable to
    /// serve chat turns.
    pub api_key: Option<String>,
    pub model: String,
    pub port: u16,
    /// Minutes a session may sit idle before it is evicted.
    pub session_idle_minutes: i64,
    /// Built frontend to serve at `/`.
    pub frontend_dist: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_key = lookup(CREDENTIAL_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        let model = lookup("GEMINI_MODEL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let session_idle_minutes = lookup("SESSION_IDLE_MINUTES")
            .and_then(|m| m.parse().ok())
            .filter(|m| *m > 0)
            .unwrap_or(DEFAULT_IDLE_MINUTES);
        let frontend_dist = lookup("FRONTEND_DIST").map(PathBuf::from);

        Self { api_key, model, port, session_idle_minutes, frontend_dist }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]);
        assert!(config.api_key.is_none());
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.port, 3000);
        assert_eq!(config.session_idle_minutes, 30);
        assert!(config.frontend_dist.is_none());
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let config = config_from(&[("API_KEY", "   ")]);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn overrides_are_read() {
        let config = config_from(&[
            ("API_KEY", "secret"),
            ("GEMINI_MODEL", "gemini-2.5-pro"),
            ("PORT", "8081"),
            ("SESSION_IDLE_MINUTES", "90"),
            ("FRONTEND_DIST", "frontend/dist"),
        ]);
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.port, 8081);
        assert_eq!(config.session_idle_minutes, 90);
        assert_eq!(config.frontend_dist, Some(PathBuf::from("frontend/dist")));
    }

    #[test]
    fn unparsable_port_falls_back() {
        assert_eq!(config_from(&[("PORT", "http")]).port, 3000);
    }

    #[test]
    fn non_positive_idle_ttl_falls_back() {
        assert_eq!(config_from(&[("SESSION_IDLE_MINUTES", "0")]).session_idle_minutes, 30);
        assert_eq!(config_from(&[("SESSION_IDLE_MINUTES", "-5")]).session_idle_minutes, 30);
    }
}
