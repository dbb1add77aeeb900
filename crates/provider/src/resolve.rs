//! Connection resolution across layered configuration sources.
//!
//! `base_url` tiers: user settings, server env, process env, registry
//! snapshot, static default. `api_key` tiers: user keys, server env, process
//! env, registry snapshot. There is no static default for the key.

use crate::{EnvSnapshot, Error, ProviderConfig, ResolutionInput};
use compact_str::CompactString;

/// Fallback environment key names used when a provider's static config does
/// not name its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultKeys<'a> {
    /// Key holding the endpoint.
    pub base_url_key: &'a str,
    /// Key holding the API key.
    pub api_token_key: &'a str,
}

impl<'a> DefaultKeys<'a> {
    /// Create a pair of default lookup keys.
    pub const fn new(base_url_key: &'a str, api_token_key: &'a str) -> Self {
        Self {
            base_url_key,
            api_token_key,
        }
    }
}

/// Effective connection parameters for one provider.
///
/// Either field may be absent; it is up to whoever opens a connection to
/// decide whether that is fatal (see [`Connection::require_api_key`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Connection {
    /// Provider these parameters belong to.
    pub provider: CompactString,
    /// Endpoint with at most one trailing `/` removed.
    pub base_url: Option<String>,
    /// API key, verbatim.
    pub api_key: Option<String>,
}

impl Connection {
    /// The endpoint, or `MissingBaseUrl`.
    pub fn require_base_url(&self) -> Result<&str, Error> {
        self.base_url
            .as_deref()
            .ok_or_else(|| Error::MissingBaseUrl {
                provider: self.provider.clone(),
            })
    }

    /// The API key, or `MissingApiKey`.
    pub fn require_api_key(&self) -> Result<&str, Error> {
        self.api_key.as_deref().ok_or_else(|| Error::MissingApiKey {
            provider: self.provider.clone(),
        })
    }
}

/// Which source supplied a value. Only used for tracing.
#[derive(Debug, Clone, Copy)]
enum Tier {
    Settings,
    UserKey,
    ServerEnv,
    Process,
    Registry,
    Static,
}

/// Resolve `config`'s connection against the request input and the shared
/// snapshot.
pub(crate) fn resolve(
    config: &ProviderConfig,
    env: &EnvSnapshot,
    input: &ResolutionInput,
    defaults: DefaultKeys<'_>,
) -> Connection {
    let name = config.name.as_str();

    let base_url_key = config
        .base_url_key
        .as_deref()
        .unwrap_or(defaults.base_url_key);
    let base_url = input
        .setting(name)
        .and_then(|s| s.base_url.as_deref())
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(|url| (Tier::Settings, url.to_owned()))
        .or_else(|| non_blank(input.server_var(base_url_key)).map(|v| (Tier::ServerEnv, v)))
        .or_else(|| non_blank(process_var(base_url_key).as_deref()).map(|v| (Tier::Process, v)))
        .or_else(|| non_blank(env.get(base_url_key)).map(|v| (Tier::Registry, v)))
        .or_else(|| non_blank(config.base_url.as_deref()).map(|v| (Tier::Static, v)));

    let api_token_key = config
        .api_token_key
        .as_deref()
        .unwrap_or(defaults.api_token_key);
    let api_key = input
        .api_key(name)
        .map(|key| (Tier::UserKey, key.to_owned()))
        .or_else(|| {
            input
                .server_var(api_token_key)
                .map(|key| (Tier::ServerEnv, key.to_owned()))
        })
        .or_else(|| process_var(api_token_key).map(|key| (Tier::Process, key)))
        .or_else(|| {
            env.get(api_token_key)
                .map(|key| (Tier::Registry, key.to_owned()))
        });

    tracing::trace!(
        provider = name,
        base_url_key,
        api_token_key,
        base_url_source = ?base_url.as_ref().map(|(tier, _)| *tier),
        api_key_source = ?api_key.as_ref().map(|(tier, _)| *tier),
        "resolved provider connection"
    );

    Connection {
        provider: config.name.clone(),
        base_url: base_url.map(|(_, url)| strip_trailing_slash(url)),
        api_key: api_key.map(|(_, key)| key),
    }
}

/// Remove a single trailing `/`. `"a//"` becomes `"a/"`.
fn strip_trailing_slash(mut url: String) -> String {
    if url.ends_with('/') {
        url.pop();
    }
    url
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(str::to_owned)
}

/// Non-unicode values count as unset.
fn process_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
