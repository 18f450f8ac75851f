//! Error types for the Test Specialist chat core
//!
//! Provides error handling for:
//! - Model selection, request and streaming failures
//! - Human interaction surface failures
//! - Configuration loading
//! - Turn state machine violations
//!
//! Nothing escapes [`TestSpecialist::handle`]: a [`ChatError`] becomes a
//! user-visible diagnostic and a terminal [`TurnResult`], and the gate treats
//! an [`InteractionError`] as a decline. [`ConfigError`] is only returned by
//! [`AssistantConfig::load`], before any turn starts.
//!
//! [`TestSpecialist::handle`]: crate::TestSpecialist::handle
//! [`TurnResult`]: crate::TurnResult
//! [`AssistantConfig::load`]: crate::AssistantConfig::load

use crate::state::TurnState;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main chat error type
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// Provider returned an empty model list
    #[error("no language model available for {vendor}/{family}")]
    NoModels {
        /// Requested vendor
        vendor: String,
        /// Requested family
        family: String,
    },

    /// Model selection, request or stream failed
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Turn state machine violation
    #[error("turn state error: {0}")]
    State(#[from] TurnStateError),
}

impl ChatError {
    /// Classify for the user-facing diagnostic
    ///
    /// Only model errors carry provider text worth sniffing; everything else
    /// is reported as a generic failure.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ModelErrorKind {
        match self {
            Self::Model(err) => err.kind(),
            _ => ModelErrorKind::Other,
        }
    }
}

/// Errors raised by a model provider or model handle
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Listing available models failed
    #[error("model selection failed: {0}")]
    Selection(String),

    /// Submitting the prompt failed
    #[error("model request failed: {0}")]
    Request(String),

    /// The response stream failed part way
    #[error("model stream failed: {0}")]
    Stream(String),
}

impl ModelError {
    /// Raw provider message
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Selection(message) | Self::Request(message) | Self::Stream(message) => message,
        }
    }

    /// Classify by the provider's message text
    #[must_use]
    pub fn kind(&self) -> ModelErrorKind {
        ModelErrorKind::classify(self.message())
    }
}

/// Category of a model failure, as shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelErrorKind {
    /// The user may not use the model
    PermissionDenied,
    /// The request or response was blocked by a content filter
    ContentFiltered,
    /// Anything else
    Other,
}

impl ModelErrorKind {
    /// Classify a raw error message by substring, ignoring case
    ///
    /// Permission wording takes precedence over filter wording.
    #[must_use]
    pub fn classify(message: &str) -> Self {
        let message = message.to_lowercase();
        if message.contains("permission") || message.contains("access") {
            Self::PermissionDenied
        } else if message.contains("blocked") || message.contains("filtered") {
            Self::ContentFiltered
        } else {
            Self::Other
        }
    }
}

/// Errors raised by the human interaction surface
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InteractionError {
    /// The choice prompt could not be shown or answered
    #[error("choice prompt failed: {0}")]
    Prompt(String),

    /// The preview document could not be opened
    #[error("could not open document: {0}")]
    Document(String),
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading the config file failed
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid TOML for [`AssistantConfig`]
    ///
    /// [`AssistantConfig`]: crate::AssistantConfig
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Turn state machine errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TurnStateError {
    /// Transition not in the allowed table
    #[error("illegal transition: {from:?} -> {to:?}")]
    IllegalTransition { from: TurnState, to: TurnState },
}

/// Result type alias for chat operations
pub type ChatResult<T> = Result<T, ChatError>;
