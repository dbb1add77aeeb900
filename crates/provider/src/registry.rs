//! `Registry`: the shared environment snapshot plus every configured
//! provider.
//!
//! Built once by the application entry point and passed around by
//! reference. Nothing here mutates after construction except each
//! provider's own model cache.

use crate::{
    DefaultKeys, EnvSnapshot, Error, ModelInfo, ModelSource, Provider, ProviderConfig,
    RegistryConfig, ResolutionInput,
};
use anyhow::Result;
use compact_str::CompactString;
use futures_util::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Named providers sharing one environment snapshot.
pub struct Registry {
    env: Arc<EnvSnapshot>,
    providers: BTreeMap<CompactString, Provider>,
    /// Provider names in declaration order.
    order: Vec<CompactString>,
}

impl Registry {
    /// Create an empty registry around `env`.
    pub fn new(env: EnvSnapshot) -> Self {
        Self {
            env: Arc::new(env),
            providers: BTreeMap::new(),
            order: Vec::new(),
        }
    }

    /// Build a registry from configuration. Providers start without dynamic
    /// sources; attach them with [`Registry::attach_source`].
    pub fn from_config(config: &RegistryConfig) -> Result<Self> {
        config.validate()?;
        let mut registry = Self::new(EnvSnapshot::new(config.env.clone()));
        for provider in &config.providers {
            registry.insert(provider.clone(), None);
        }
        tracing::info!(
            "registry initialized with {} provider(s) and {} env var(s)",
            registry.len(),
            registry.env.len()
        );
        Ok(registry)
    }

    /// Add a provider built from `config`.
    ///
    /// A provider with the same name is replaced, together with its cached
    /// models and source, and keeps its original position. Replacement is
    /// logged as a warning.
    pub fn with_provider(
        mut self,
        config: ProviderConfig,
        source: Option<Arc<dyn ModelSource>>,
    ) -> Self {
        self.insert(config, source);
        self
    }

    fn insert(&mut self, config: ProviderConfig, source: Option<Arc<dyn ModelSource>>) {
        let name = config.name.clone();
        let mut provider = Provider::new(config, Arc::clone(&self.env));
        if let Some(source) = source {
            provider = provider.with_source(source);
        }
        if self.providers.insert(name.clone(), provider).is_some() {
            tracing::warn!("replacing existing provider '{name}'");
        } else {
            self.order.push(name);
        }
    }

    /// Give an existing provider a dynamic model source.
    pub fn attach_source(&mut self, name: &str, source: Arc<dyn ModelSource>) -> Result<(), Error> {
        let provider = self
            .providers
            .remove(name)
            .ok_or_else(|| Error::UnknownProvider(CompactString::from(name)))?;
        self.providers
            .insert(CompactString::from(name), provider.with_source(source));
        Ok(())
    }

    /// The shared environment snapshot.
    pub fn env(&self) -> &EnvSnapshot {
        &self.env
    }

    /// Look up a provider by name.
    pub fn get(&self, name: &str) -> Option<&Provider> {
        self.providers.get(name)
    }

    /// Look up a provider by name, failing with `UnknownProvider`.
    pub fn provider(&self, name: &str) -> Result<&Provider, Error> {
        self.get(name)
            .ok_or_else(|| Error::UnknownProvider(CompactString::from(name)))
    }

    /// Providers in declaration order.
    pub fn providers(&self) -> impl Iterator<Item = &Provider> {
        self.order.iter().filter_map(|name| self.providers.get(name))
    }

    /// The first declared provider.
    pub fn default_provider(&self) -> Option<&Provider> {
        self.providers().next()
    }

    /// Number of providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether no providers are registered.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// All models offered for this request: static models followed by
    /// dynamic ones, for every provider the user has not disabled.
    ///
    /// Dynamic lists are fetched concurrently. A failed fetch is logged and
    /// contributes nothing.
    pub async fn model_list(
        &self,
        input: &ResolutionInput,
        defaults: DefaultKeys<'_>,
    ) -> Vec<ModelInfo> {
        let enabled: Vec<&Provider> = self
            .providers()
            .filter(|p| input.is_enabled(p.name()))
            .collect();

        let dynamic = join_all(enabled.iter().map(|p| p.dynamic_models(input, defaults))).await;

        let mut models = Vec::new();
        for (provider, dynamic) in enabled.into_iter().zip(dynamic) {
            models.extend_from_slice(provider.static_models());
            match dynamic {
                Some(Ok(list)) => models.extend(list.iter().cloned()),
                Some(Err(e)) => {
                    tracing::warn!("failed to fetch models for '{}': {e:#}", provider.name());
                }
                None => {}
            }
        }
        models
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("providers", &self.order)
            .field("env", &self.env.len())
            .finish()
    }
}
