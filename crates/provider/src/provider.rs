//! `Provider`: one backend's static config, cache and optional fetch
//! capability.

use crate::{
    Connection, DefaultKeys, EnvSnapshot, ModelCache, ModelInfo, ProviderConfig, ResolutionInput,
    cache, resolve,
};
use anyhow::Result;
use futures_util::future::BoxFuture;
use std::sync::Arc;

/// Discovers models at runtime, usually by asking the backend's API.
///
/// Only some backends can do this. A provider without a source simply has
/// no dynamic models; there is no default no-op implementation.
pub trait ModelSource: Send + Sync {
    /// Fetch the current model list using the resolved connection.
    fn fetch_models<'a>(
        &'a self,
        connection: &'a Connection,
        input: &'a ResolutionInput,
    ) -> BoxFuture<'a, Result<Vec<ModelInfo>>>;
}

/// A single LLM backend.
///
/// Created once at startup and shared for the lifetime of the process.
pub struct Provider {
    config: ProviderConfig,
    env: Arc<EnvSnapshot>,
    cache: ModelCache,
    source: Option<Arc<dyn ModelSource>>,
}

impl Provider {
    /// Create a provider without a dynamic model source.
    pub fn new(config: ProviderConfig, env: Arc<EnvSnapshot>) -> Self {
        Self {
            cache: ModelCache::new(config.name.clone()),
            config,
            env,
            source: None,
        }
    }

    /// Attach a dynamic model source.
    pub fn with_source(mut self, source: Arc<dyn ModelSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Provider name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Static configuration.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Models declared in static configuration.
    pub fn static_models(&self) -> &[ModelInfo] {
        &self.config.static_models
    }

    /// Whether this provider can discover models at runtime.
    pub fn supports_dynamic_fetch(&self) -> bool {
        self.source.is_some()
    }

    /// The dynamic model source, if any.
    pub fn source(&self) -> Option<&Arc<dyn ModelSource>> {
        self.source.as_ref()
    }

    /// Resolve the effective endpoint and API key for this request.
    pub fn resolve_connection(
        &self,
        input: &ResolutionInput,
        defaults: DefaultKeys<'_>,
    ) -> Connection {
        resolve::resolve(&self.config, &self.env, input, defaults)
    }

    /// Fingerprint of the parts of `input` this provider's cache depends on.
    pub fn fingerprint(&self, input: &ResolutionInput) -> String {
        cache::fingerprint(&self.config.name, input)
    }

    /// Cached dynamic models, if they were fetched under the same
    /// configuration as `input`.
    pub fn cached_models(&self, input: &ResolutionInput) -> Option<Arc<[ModelInfo]>> {
        self.cache.get(&self.fingerprint(input))
    }

    /// Overwrite the cache with `models`, keyed by `input`.
    pub fn store_models(&self, input: &ResolutionInput, models: impl Into<Arc<[ModelInfo]>>) {
        self.cache.store(self.fingerprint(input), models);
    }

    /// Dynamic models for `input`: served from cache when still valid,
    /// fetched and cached otherwise. Returns `None` when the provider has no
    /// source.
    pub async fn dynamic_models(
        &self,
        input: &ResolutionInput,
        defaults: DefaultKeys<'_>,
    ) -> Option<Result<Arc<[ModelInfo]>>> {
        let source = self.source.as_ref()?;
        if let Some(models) = self.cached_models(input) {
            return Some(Ok(models));
        }

        let connection = self.resolve_connection(input, defaults);
        let result = source
            .fetch_models(&connection, input)
            .await
            .map(|models| {
                let models: Arc<[ModelInfo]> = models.into();
                self.store_models(input, Arc::clone(&models));
                models
            });
        Some(result)
    }
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("name", &self.config.name)
            .field("dynamic", &self.source.is_some())
            .field("cache", &self.cache)
            .finish()
    }
}
