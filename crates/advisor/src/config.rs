//! Advisor configuration from environment variables

use std::env;
use std::fmt;

use crate::error::AdvisorError;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Clone)]
pub struct AdvisorConfig {
    pub api_key: String,

    /// Model name used in the generateContent path
    pub model: String,

    /// API root, without a trailing `/models`
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Attempts per advisor call, including the first (1..=5)
    pub max_attempts: u32,
}

impl AdvisorConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            max_attempts: 2,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AdvisorError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AdvisorError> {
        let api_key = lookup("GEMINI_API_KEY")
            .or_else(|| lookup("API_KEY"))
            .filter(|key| !key.trim().is_empty())
            .ok_or(AdvisorError::Config("GEMINI_API_KEY not set"))?;

        let mut config = Self::new(api_key.trim());

        if let Some(model) = lookup("GEMINI_MODEL").filter(|v| !v.trim().is_empty()) {
            config.model = model.trim().to_string();
        }
        if let Some(url) = lookup("GEMINI_BASE_URL").filter(|v| !v.trim().is_empty()) {
            config.base_url = url.trim().trim_end_matches('/').to_string();
        }
        config.timeout_secs = lookup("ADVISOR_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(config.timeout_secs);
        config.max_attempts = lookup("ADVISOR_MAX_ATTEMPTS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(config.max_attempts)
            .clamp(1, 5);

        Ok(config)
    }
}

impl fmt::Debug for AdvisorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdvisorConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AdvisorConfig::from_lookup(lookup_from(&[("GEMINI_API_KEY", "k")])).unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.max_attempts, 2);
    }

    #[test]
    fn test_api_key_fallback_and_overrides() {
        let config = AdvisorConfig::from_lookup(lookup_from(&[
            ("API_KEY", "legacy"),
            ("GEMINI_MODEL", "gemini-2.5-pro"),
            ("GEMINI_BASE_URL", "http://localhost:9000/v1/"),
            ("ADVISOR_TIMEOUT_SECS", "5"),
            ("ADVISOR_MAX_ATTEMPTS", "40"),
        ]))
        .unwrap();
        assert_eq!(config.api_key, "legacy");
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.base_url, "http://localhost:9000/v1");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.max_attempts, 5);
    }

    #[test]
    fn test_missing_key() {
        let err = AdvisorConfig::from_lookup(lookup_from(&[("GEMINI_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, AdvisorError::Config(_)));
    }

    #[test]
    fn test_debug_redacts_key() {
        let text = format!("{:?}", AdvisorConfig::new("secret-value"));
        assert!(!text.contains("secret-value"));
    }
}
