//! Host capabilities the chat core depends on
//!
//! The core never reaches for editor globals. The host implements these
//! traits and hands them to [`TestSpecialist`]:
//!
//! - [`ModelProvider`] / [`ModelHandle`]: model selection and streaming
//! - [`OutputSurface`]: append-only markdown sink for the chat response
//! - [`HumanInteraction`]: the blocking choice dialog and document display
//!
//! [`TestSpecialist`]: crate::TestSpecialist

use crate::config::ModelSelector;
use crate::error::{InteractionError, ModelError};
use crate::types::{Choice, PromptMessage};
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Response fragments in arrival order
///
/// Fragment boundaries carry no meaning; a fragment may end mid-word.
pub type FragmentStream = BoxStream<'static, Result<String, ModelError>>;

/// Source of model handles
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Models matching `selector`; an empty list is not an error here
    async fn select_models(
        &self,
        selector: &ModelSelector,
    ) -> Result<Vec<Arc<dyn ModelHandle>>, ModelError>;
}

/// A model that can answer a prompt
#[async_trait]
pub trait ModelHandle: Send + Sync {
    /// Identifier for logging
    fn id(&self) -> &str;

    /// Submit `messages` and stream back the response
    ///
    /// Implementations should stop producing fragments once `cancel` fires;
    /// the orchestrator stops reading regardless.
    async fn send_request(
        &self,
        messages: Vec<PromptMessage>,
        cancel: CancellationToken,
    ) -> Result<FragmentStream, ModelError>;
}

/// Append-only markdown sink for the chat response
pub trait OutputSurface: Send + Sync {
    /// Append markdown to the response
    fn write_markdown(&self, text: &str);
}

/// Blocking interaction with the human
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HumanInteraction: Send + Sync {
    /// Show `message` with `options`; `None` when dismissed
    async fn ask_choice(
        &self,
        message: &str,
        options: &[Choice],
    ) -> Result<Option<Choice>, InteractionError>;

    /// Display a document; returns once display has been initiated
    async fn open_document(&self, content: &str, content_type: &str)
        -> Result<(), InteractionError>;
}
