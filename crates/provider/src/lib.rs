//! Provider connection resolution with a fingerprint-keyed model cache.
//!
//! A `Provider` derives its effective `base_url` and `api_key` from layered
//! sources: user settings and keys, server env, process env, the registry's
//! shared `EnvSnapshot`, and its own static defaults. Dynamically discovered
//! models are cached per provider and served only while the configuration
//! that produced them is unchanged. `Registry` owns the shared snapshot and
//! every provider.

pub mod cache;
pub mod config;
mod env;
mod error;
mod input;
mod model;
mod provider;
mod registry;
mod resolve;

pub use {
    cache::{ModelCache, fingerprint},
    config::{ProviderConfig, RegistryConfig},
    env::EnvSnapshot,
    error::Error,
    input::{ProviderSetting, ResolutionInput},
    model::{Capabilities, ModelInfo},
    provider::{ModelSource, Provider},
    registry::Registry,
    resolve::{Connection, DefaultKeys},
};
