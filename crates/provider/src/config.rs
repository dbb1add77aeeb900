//! Provider and registry configuration loaded from TOML.
//!
//! `ProviderConfig` is the static half of a provider: defaults and lookup key
//! names that never change at runtime. `RegistryConfig` bundles all providers
//! with the environment snapshot shared between them.

use crate::model::ModelInfo;
use anyhow::{Context, Result, bail};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Static configuration for one backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Unique provider name. Also the key into per-request API keys and
    /// settings.
    pub name: CompactString,
    /// Endpoint used when no other source supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Environment key holding the endpoint. Overrides the caller's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url_key: Option<String>,
    /// Environment key holding the API key. Overrides the caller's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token_key: Option<String>,
    /// Display label for pickers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Where a user can obtain an API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_link: Option<String>,
    /// Icon path or URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Models always offered by this provider.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub static_models: Vec<ModelInfo>,
}

impl ProviderConfig {
    /// Create a config with only a name.
    pub fn new(name: impl Into<CompactString>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Reject configs that could never be addressed.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("provider name must not be empty");
        }
        if self.static_models.iter().any(|m| m.name.is_empty()) {
            bail!("provider '{}' declares a static model without a name", self.name);
        }
        Ok(())
    }

    /// Expand `${VAR}` references in every string field except the name.
    fn expand_env(&mut self) -> Result<()> {
        let name = &self.name;
        let fields = [
            &mut self.base_url,
            &mut self.base_url_key,
            &mut self.api_token_key,
            &mut self.label,
            &mut self.api_key_link,
            &mut self.icon,
        ];
        for field in fields.into_iter().flatten() {
            *field = expand_env_vars(field)
                .with_context(|| format!("in provider '{name}'"))?;
        }
        Ok(())
    }
}

/// Top-level configuration: the shared environment plus every provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Environment snapshot shared by all providers (`[env]` table).
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    /// Provider declarations (`[[providers]]` array), in declaration order.
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
}

impl RegistryConfig {
    /// Parse a TOML string, then expand `${VAR}` references in the parsed
    /// string values from the process environment.
    ///
    /// Expansion never touches the TOML source, so a variable's value can
    /// not change the document structure.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(toml_str).context("invalid registry config")?;
        for (key, value) in &mut config.env {
            *value = expand_env_vars(value).with_context(|| format!("in env '{key}'"))?;
        }
        for provider in &mut config.providers {
            provider.expand_env()?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Validate every provider and reject duplicate names.
    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for provider in &self.providers {
            provider.validate()?;
            if !seen.insert(provider.name.as_str()) {
                bail!("duplicate provider '{}'", provider.name);
            }
        }
        Ok(())
    }
}

/// Expand `${VAR}` patterns with process environment values.
///
/// Unknown variables are replaced with an empty string. A `${` without a
/// closing `}` is an error.
pub fn expand_env_vars(input: &str) -> Result<String> {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next();
            let mut var_name = String::new();
            let mut closed = false;
            for c in chars.by_ref() {
                if c == '}' {
                    closed = true;
                    break;
                }
                var_name.push(c);
            }
            if !closed {
                bail!("unterminated ${{...}} in config value '{input}'");
            }
            if let Ok(val) = std::env::var(&var_name) {
                result.push_str(&val);
            }
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}
