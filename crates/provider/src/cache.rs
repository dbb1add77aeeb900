//! Fingerprint-keyed cache for dynamically discovered models.

use crate::{ModelInfo, ProviderSetting, ResolutionInput};
use compact_str::CompactString;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// The slice of a [`ResolutionInput`] that decides whether a cached model
/// list is still valid.
#[derive(Serialize)]
struct FingerprintView<'a> {
    api_key: Option<&'a str>,
    provider_settings: Option<&'a ProviderSetting>,
    server_env: &'a BTreeMap<String, String>,
}

/// Deterministic fingerprint of the configuration `provider` depends on.
///
/// Covers the provider's API key, its settings and the whole server env.
/// Every map is a `BTreeMap`, so keys serialize sorted and construction order
/// never matters.
pub fn fingerprint(provider: &str, input: &ResolutionInput) -> String {
    let view = FingerprintView {
        api_key: input.api_key(provider),
        provider_settings: input.setting(provider),
        server_env: &input.server_env,
    };
    // Only strings, options and string-keyed maps: serialization cannot fail.
    serde_json::to_string(&view).unwrap_or_default()
}

struct Entry {
    fingerprint: String,
    models: Arc<[ModelInfo]>,
}

/// Single-entry model cache.
///
/// A read and a concurrent store are not coordinated beyond the lock on the
/// entry itself. Losing that race only costs a later miss: a store always
/// replaces the whole entry.
#[derive(Default)]
pub struct ModelCache {
    /// Owning provider, for logs.
    provider: CompactString,
    entry: RwLock<Option<Entry>>,
}

impl ModelCache {
    /// Create an empty cache owned by `provider`.
    pub fn new(provider: impl Into<CompactString>) -> Self {
        Self {
            provider: provider.into(),
            entry: RwLock::new(None),
        }
    }

    /// Return the cached models if they were stored under `fingerprint`.
    ///
    /// A mismatching entry is dropped so it cannot be served later.
    pub fn get(&self, fingerprint: &str) -> Option<Arc<[ModelInfo]>> {
        let mut entry = self.entry.write();
        let cached = entry.as_ref()?;
        if cached.fingerprint != fingerprint {
            tracing::debug!(
                provider = %self.provider,
                "configuration changed, dropping cached models"
            );
            *entry = None;
            return None;
        }
        Some(Arc::clone(&cached.models))
    }

    /// Replace the cache entry.
    pub fn store(&self, fingerprint: String, models: impl Into<Arc<[ModelInfo]>>) {
        let models = models.into();
        tracing::debug!(
            provider = %self.provider,
            "caching {} dynamic model(s)",
            models.len()
        );
        *self.entry.write() = Some(Entry {
            fingerprint,
            models,
        });
    }

    /// Whether an entry is present, regardless of its fingerprint.
    pub fn is_populated(&self) -> bool {
        self.entry.read().is_some()
    }
}

impl std::fmt::Debug for ModelCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entry = self.entry.read();
        f.debug_struct("ModelCache")
            .field("provider", &self.provider)
            .field("models", &entry.as_ref().map(|e| e.models.len()))
            .finish()
    }
}
