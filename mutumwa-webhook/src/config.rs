//! Webhook client configuration.

use mutumwa_core::{DomainRegistry, Language, DEFAULT_WEBHOOK_BASE};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{WebhookError, WebhookResult};

/// Environment variable overriding the base URL of the built-in domains.
pub const ENV_WEBHOOK_BASE: &str = "MUTUMWA_WEBHOOK_BASE";
/// Environment variable overriding the request timeout, in seconds.
pub const ENV_TIMEOUT_SECS: &str = "MUTUMWA_TIMEOUT_SECS";
/// Environment variable overriding the default reply language.
pub const ENV_LANGUAGE: &str = "MUTUMWA_LANGUAGE";

/// Configuration for [`WebhookClient`](crate::WebhookClient).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Whole-request timeout in seconds, covering the streamed body.
    pub timeout_seconds: u64,
    /// User agent sent with each request.
    pub user_agent: Option<String>,
    /// Reply language used when a turn does not pick one.
    pub default_language: Language,
    /// Selectable domains and their webhooks.
    pub domains: DomainRegistry,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 300,
            user_agent: Some(concat!("mutumwa/", env!("CARGO_PKG_VERSION")).to_string()),
            default_language: Language::default(),
            domains: DomainRegistry::default(),
        }
    }
}

impl WebhookConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the process environment.
    pub fn from_env() -> WebhookResult<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> WebhookResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base) = lookup(ENV_WEBHOOK_BASE).filter(|v| !v.trim().is_empty()) {
            config.domains = DomainRegistry::builtin(base.trim())?;
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                WebhookError::configuration(format!("{ENV_TIMEOUT_SECS} must be a number of seconds, got '{raw}'"))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        if let Some(language) = lookup(ENV_LANGUAGE).filter(|v| !v.trim().is_empty()) {
            config.default_language = Language::new(language);
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the request timeout.
    ///
    /// Only whole seconds are kept; a partial second rounds up, so any
    /// non-zero duration stays non-zero.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let partial = u64::from(timeout.subsec_nanos() > 0);
        self.timeout_seconds = timeout.as_secs().saturating_add(partial);
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the default reply language.
    #[must_use]
    pub fn with_language(mut self, language: Language) -> Self {
        self.default_language = language;
        self
    }

    /// Replace the domain registry.
    #[must_use]
    pub fn with_domains(mut self, domains: DomainRegistry) -> Self {
        self.domains = domains;
        self
    }

    /// Point the built-in domains at another base URL.
    pub fn with_webhook_base(self, base: &str) -> WebhookResult<Self> {
        let domains = DomainRegistry::builtin(base)?;
        Ok(self.with_domains(domains))
    }

    /// The request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> WebhookResult<()> {
        if self.timeout_seconds == 0 {
            return Err(WebhookError::configuration("timeout must be at least one second"));
        }
        Ok(())
    }

    /// Whether the built-in domains still use the stock base URL.
    #[must_use]
    pub fn uses_default_base(&self) -> bool {
        self.domains
            .iter()
            .all(|d| d.webhook_url.as_str().starts_with(DEFAULT_WEBHOOK_BASE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = WebhookConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(300));
        assert_eq!(config.default_language.as_str(), "english");
        assert!(config.uses_default_base());
        assert!(config.user_agent.as_deref().unwrap().starts_with("mutumwa/"));
    }

    #[test]
    fn test_from_vars_empty_is_default() {
        let config = WebhookConfig::from_vars(vars(&[])).unwrap();
        assert_eq!(config, WebhookConfig::default());
    }

    #[test]
    fn test_from_vars_overrides() {
        let config = WebhookConfig::from_vars(vars(&[
            (ENV_WEBHOOK_BASE, "http://localhost:5678/webhook"),
            (ENV_TIMEOUT_SECS, " 45 "),
            (ENV_LANGUAGE, "Ndebele"),
        ]))
        .unwrap();

        assert_eq!(config.timeout(), Duration::from_secs(45));
        assert_eq!(config.default_language.as_str(), "ndebele");
        assert_eq!(
            config.domains.get("praz").unwrap().webhook_url.as_str(),
            "http://localhost:5678/webhook/praz"
        );
        assert!(!config.uses_default_base());
    }

    #[test]
    fn test_from_vars_rejects_bad_timeout() {
        let err = WebhookConfig::from_vars(vars(&[(ENV_TIMEOUT_SECS, "soon")])).unwrap_err();
        assert!(matches!(err, WebhookError::Configuration(_)));

        let err = WebhookConfig::from_vars(vars(&[(ENV_TIMEOUT_SECS, "0")])).unwrap_err();
        assert!(matches!(err, WebhookError::Configuration(_)));
    }

    #[test]
    fn test_with_timeout_rounds_partial_seconds_up() {
        let config = WebhookConfig::default().with_timeout(Duration::from_millis(500));
        assert_eq!(config.timeout(), Duration::from_secs(1));
        assert!(config.validate().is_ok());

        let config = WebhookConfig::default().with_timeout(Duration::from_millis(1500));
        assert_eq!(config.timeout(), Duration::from_secs(2));

        let config = WebhookConfig::default().with_timeout(Duration::from_secs(30));
        assert_eq!(config.timeout(), Duration::from_secs(30));

        let config = WebhookConfig::default().with_timeout(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_vars_rejects_bad_base() {
        let err = WebhookConfig::from_vars(vars(&[(ENV_WEBHOOK_BASE, "nope")])).unwrap_err();
        assert!(matches!(err, WebhookError::Core(_)));
    }

    #[test]
    fn test_serde_defaults_missing_fields() {
        let config: WebhookConfig = serde_json::from_str(r#"{"timeout_seconds": 10}"#).unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.domains, DomainRegistry::default());
    }
}
