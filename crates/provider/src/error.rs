//! Errors raised by callers validating resolved configuration.
//!
//! Resolution and caching never fail on their own; these variants exist for
//! the code that turns an absent value into a hard requirement.

use compact_str::CompactString;

/// Provider lookup and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No source supplied an endpoint.
    #[error("no base URL configured for provider '{provider}'")]
    MissingBaseUrl {
        /// Provider name.
        provider: CompactString,
    },
    /// No source supplied an API key.
    #[error("no API key configured for provider '{provider}'")]
    MissingApiKey {
        /// Provider name.
        provider: CompactString,
    },
    /// The registry has no provider with this name.
    #[error("provider '{0}' not found")]
    UnknownProvider(CompactString),
}
