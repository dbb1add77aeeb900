//! Model descriptors shared by static declarations and dynamic discovery.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// One selectable model exposed by a provider.
///
/// Treated as a value: once built it is only ever cloned or shared, never
/// mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier sent to the backend (e.g. `"gpt-4o"`).
    pub name: CompactString,
    /// Human-readable label. Defaults to `name` when omitted.
    #[serde(default)]
    pub label: String,
    /// Name of the provider that serves this model.
    pub provider: CompactString,
    /// Maximum context window in tokens.
    #[serde(default = "default_context_length")]
    pub context_length: usize,
    /// Capability flags.
    #[serde(default)]
    pub capabilities: Capabilities,
}

impl ModelInfo {
    /// Create a model with the default context length and no capabilities.
    pub fn new(name: impl Into<CompactString>, provider: impl Into<CompactString>) -> Self {
        let name = name.into();
        Self {
            label: name.to_string(),
            name,
            provider: provider.into(),
            context_length: default_context_length(),
            capabilities: Capabilities::default(),
        }
    }

    /// Set the human-readable label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the context window.
    pub fn with_context_length(mut self, context_length: usize) -> Self {
        self.context_length = context_length;
        self
    }

    /// Set the capability flags.
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Label for display, falling back to the model name.
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            self.name.as_str()
        } else {
            self.label.as_str()
        }
    }
}

/// What a model can do beyond plain text chat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Accepts image input.
    #[serde(default)]
    pub vision: bool,
    /// Supports tool calling.
    #[serde(default)]
    pub tools: bool,
    /// Emits reasoning/thinking output.
    #[serde(default)]
    pub reasoning: bool,
}

fn default_context_length() -> usize {
    8_000
}
