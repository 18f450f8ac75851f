//! Assistant configuration
//!
//! Every field has a default, so an empty TOML document is a valid config.

use crate::error::ConfigError;
use crate::prompt::{HITL_BANNER, SYSTEM_INSTRUCTION};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which model family to ask the provider for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSelector {
    /// Provider vendor (e.g. "copilot")
    pub vendor: String,
    /// Model family (e.g. "gpt-4o")
    pub family: String,
}

impl Default for ModelSelector {
    fn default() -> Self {
        Self {
            vendor: "copilot".to_string(),
            family: "gpt-4o".to_string(),
        }
    }
}

/// Test Specialist configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Chat participant id registered with the host
    pub participant_id: String,
    /// Model to request
    pub model: ModelSelector,
    /// Instruction prepended to every prompt
    pub system_instruction: String,
    /// Text shown before asking for confirmation
    pub hitl_banner: String,
}

impl AssistantConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With model selector
    #[inline]
    #[must_use]
    pub fn with_model(mut self, vendor: impl Into<String>, family: impl Into<String>) -> Self {
        self.model = ModelSelector {
            vendor: vendor.into(),
            family: family.into(),
        };
        self
    }

    /// With system instruction
    #[inline]
    #[must_use]
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }

    /// Parse from TOML text; missing keys take their defaults
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded assistant config");
        Ok(config)
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            participant_id: "test-specialist.assistant".to_string(),
            model: ModelSelector::default(),
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            hitl_banner: HITL_BANNER.to_string(),
        }
    }
}
