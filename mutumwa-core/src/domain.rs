//! Domains (tenants) and target languages.
//!
//! Each domain routes turns to its own webhook. The registry is an explicit
//! value handed to whoever needs it rather than a global table.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::{CoreError, Result};

/// Default base URL the built-in domains hang off.
pub const DEFAULT_WEBHOOK_BASE: &str = "https://n8n.afrainity.com/webhook";

/// Built-in domain values, in display order.
pub const BUILTIN_DOMAINS: [&str; 3] = ["general", "zesa", "praz"];

/// A tenant namespace with its own webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    /// Machine value (`general`, `zesa`, ...).
    pub value: String,
    /// Display label.
    pub label: String,
    /// Webhook that answers turns for this domain.
    pub webhook_url: Url,
}

impl Domain {
    /// Create a domain, validating the webhook URL.
    pub fn new(value: impl Into<String>, label: impl Into<String>, webhook_url: &str) -> Result<Self> {
        let webhook_url = Url::parse(webhook_url)
            .map_err(|e| CoreError::config(format!("invalid webhook URL '{webhook_url}': {e}")))?;
        Ok(Self {
            value: value.into(),
            label: label.into(),
            webhook_url,
        })
    }

    /// Create a domain whose webhook is `<base>/<value>` and whose label is
    /// the upper-cased value.
    pub fn under_base(value: impl Into<String>, base: &str) -> Result<Self> {
        let value = value.into();
        let url = format!("{}/{}", base.trim_end_matches('/'), value);
        let label = value.to_uppercase();
        Self::new(value, label, &url)
    }
}

/// The set of selectable domains. The first entry is the default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Domain>", into = "Vec<Domain>")]
pub struct DomainRegistry {
    domains: Vec<Domain>,
}

impl DomainRegistry {
    /// Create a registry from explicit domains.
    pub fn new(domains: Vec<Domain>) -> Result<Self> {
        if domains.is_empty() {
            return Err(CoreError::config("domain registry must not be empty"));
        }
        Ok(Self { domains })
    }

    /// The built-in domains hung off `base`.
    pub fn builtin(base: &str) -> Result<Self> {
        let domains = BUILTIN_DOMAINS
            .iter()
            .map(|value| Domain::under_base(*value, base))
            .collect::<Result<Vec<_>>>()?;
        Self::new(domains)
    }

    /// Look up a domain by value.
    pub fn get(&self, value: &str) -> Result<&Domain> {
        self.domains
            .iter()
            .find(|d| d.value == value)
            .ok_or_else(|| CoreError::UnknownDomain(value.to_string()))
    }

    /// Resolve a possibly-stale stored selection, falling back to the default.
    pub fn resolve(&self, value: Option<&str>) -> Result<&Domain> {
        match value.and_then(|v| self.domains.iter().find(|d| d.value == v)) {
            Some(domain) => Ok(domain),
            None => self.default_domain(),
        }
    }

    /// The default domain: the first one registered.
    pub fn default_domain(&self) -> Result<&Domain> {
        self.domains
            .first()
            .ok_or_else(|| CoreError::config("domain registry is empty"))
    }

    /// The built-in domains under `base`, or an empty registry if `base`
    /// does not produce valid URLs. The failure is logged.
    fn builtin_or_empty(base: &str) -> Self {
        Self::builtin(base).unwrap_or_else(|e| {
            tracing::error!(base, error = %e, "built-in domains unavailable");
            Self { domains: Vec::new() }
        })
    }

    /// Iterate over domains in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Domain> {
        self.domains.iter()
    }
}

impl Default for DomainRegistry {
    fn default() -> Self {
        Self::builtin_or_empty(DEFAULT_WEBHOOK_BASE)
    }
}

impl TryFrom<Vec<Domain>> for DomainRegistry {
    type Error = CoreError;

    fn try_from(domains: Vec<Domain>) -> Result<Self> {
        Self::new(domains)
    }
}

impl From<DomainRegistry> for Vec<Domain> {
    fn from(registry: DomainRegistry) -> Self {
        registry.domains
    }
}

/// Target language for replies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Language(String);

impl Language {
    /// The default reply language.
    pub const DEFAULT: &'static str = "english";

    /// Create a language from its value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_lowercase())
    }

    /// Language value as sent to the webhook.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Language {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry() {
        let registry = DomainRegistry::default();
        let values: Vec<_> = registry.iter().map(|d| d.value.as_str()).collect();
        assert_eq!(values, ["general", "zesa", "praz"]);

        let zesa = registry.get("zesa").unwrap();
        assert_eq!(zesa.label, "ZESA");
        assert_eq!(
            zesa.webhook_url.as_str(),
            "https://n8n.afrainity.com/webhook/zesa"
        );
    }

    #[test]
    fn test_unknown_domain() {
        let registry = DomainRegistry::default();
        assert!(matches!(
            registry.get("tax"),
            Err(CoreError::UnknownDomain(v)) if v == "tax"
        ));
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        let registry = DomainRegistry::default();
        assert_eq!(registry.resolve(Some("praz")).unwrap().value, "praz");
        assert_eq!(registry.resolve(Some("gone")).unwrap().value, "general");
        assert_eq!(registry.resolve(None).unwrap().value, "general");
    }

    #[test]
    fn test_builtin_with_custom_base() {
        let registry = DomainRegistry::builtin("http://localhost:5678/webhook/").unwrap();
        assert_eq!(
            registry.default_domain().unwrap().webhook_url.as_str(),
            "http://localhost:5678/webhook/general"
        );
    }

    #[test]
    fn test_invalid_url_is_config_error() {
        let err = Domain::new("x", "X", "not a url").unwrap_err();
        assert!(matches!(err, CoreError::Configuration(_)));
    }

    #[test]
    fn test_empty_registry_rejected() {
        assert!(DomainRegistry::new(Vec::new()).is_err());
    }

    #[test]
    fn test_default_matches_builtin() {
        let registry = DomainRegistry::default();
        assert_eq!(registry, DomainRegistry::builtin(DEFAULT_WEBHOOK_BASE).unwrap());
        assert_eq!(registry.default_domain().unwrap().value, "general");
    }

    #[test]
    fn test_unusable_base_gives_errors_not_panics() {
        let registry = DomainRegistry::builtin_or_empty("not a url");
        assert_eq!(registry.iter().count(), 0);
        assert!(matches!(
            registry.default_domain(),
            Err(CoreError::Configuration(_))
        ));
        assert!(registry.resolve(Some("general")).is_err());
        assert!(registry.resolve(None).is_err());
    }

    #[test]
    fn test_registry_serde_rejects_empty() {
        assert!(serde_json::from_str::<DomainRegistry>("[]").is_err());

        let json = serde_json::to_string(&DomainRegistry::default()).unwrap();
        let back: DomainRegistry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, DomainRegistry::default());
    }

    #[test]
    fn test_language() {
        assert_eq!(Language::default().as_str(), "english");
        assert_eq!(Language::new(" Shona ").as_str(), "shona");
    }
}
