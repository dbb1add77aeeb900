//! Per-request configuration handed to resolution and cache lookups.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Request-scoped configuration sources.
///
/// Built fresh for every call and never stored. All mappings are ordered so
/// that two inputs holding the same pairs serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionInput {
    /// API keys entered by the user, keyed by provider name.
    #[serde(default)]
    pub api_keys: BTreeMap<String, String>,
    /// User settings, keyed by provider name.
    #[serde(default)]
    pub provider_settings: BTreeMap<String, ProviderSetting>,
    /// Environment scoped to the current request or server context.
    #[serde(default)]
    pub server_env: BTreeMap<String, String>,
}

impl ResolutionInput {
    /// Set the API key for `provider`.
    pub fn with_api_key(mut self, provider: impl Into<String>, key: impl Into<String>) -> Self {
        self.api_keys.insert(provider.into(), key.into());
        self
    }

    /// Set the user settings for `provider`.
    pub fn with_setting(mut self, provider: impl Into<String>, setting: ProviderSetting) -> Self {
        self.provider_settings.insert(provider.into(), setting);
        self
    }

    /// Set a server environment variable.
    pub fn with_server_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.server_env.insert(key.into(), value.into());
        self
    }

    /// User-entered API key for `provider`.
    pub fn api_key(&self, provider: &str) -> Option<&str> {
        self.api_keys.get(provider).map(String::as_str)
    }

    /// User settings for `provider`.
    pub fn setting(&self, provider: &str) -> Option<&ProviderSetting> {
        self.provider_settings.get(provider)
    }

    /// Server environment lookup.
    pub fn server_var(&self, key: &str) -> Option<&str> {
        self.server_env.get(key).map(String::as_str)
    }

    /// Whether the user has switched `provider` off. Providers without
    /// settings are enabled.
    pub fn is_enabled(&self, provider: &str) -> bool {
        self.setting(provider)
            .and_then(|s| s.enabled)
            .unwrap_or(true)
    }
}

/// User-entered settings for a single provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSetting {
    /// Whether the provider is offered at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Endpoint override typed in by the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl ProviderSetting {
    /// Settings carrying only a base URL override.
    pub fn base_url(url: impl Into<String>) -> Self {
        Self {
            enabled: None,
            base_url: Some(url.into()),
        }
    }
}
