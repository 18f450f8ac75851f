//! Testing utilities for the Test Specialist workspace
//!
//! Scripted collaborators that record what the orchestrator did with them.

#![allow(missing_docs)]

use async_trait::async_trait;
use futures::StreamExt;
use parking_lot::Mutex;
use specialist_chat::{
    Choice, FragmentStream, HumanInteraction, InteractionError, ModelError, ModelHandle,
    ModelProvider, ModelSelector, OutputSurface, PromptMessage,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Scenario A response
pub const NULL_CHECK_RESPONSE: &str =
    "**PROPOSED_CHANGE:** Add null check.\n\n```ts\nif (!x) return;\n```\n\nDone.";

/// Split `text` into `parts` pieces of roughly equal size, on char boundaries
pub fn split_fragments(text: &str, parts: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let size = chars.len().div_ceil(parts.max(1)).max(1);
    chars.chunks(size).map(|c| c.iter().collect()).collect()
}

/// Model that replays fixed fragments
#[derive(Debug)]
pub struct ScriptedModel {
    id: String,
    fragments: Vec<String>,
    request_error: Option<String>,
    stream_error_after: Option<(usize, String)>,
    cancel_after: Option<usize>,
    requests: Mutex<Vec<Vec<PromptMessage>>>,
}

impl ScriptedModel {
    pub fn new(fragments: Vec<String>) -> Self {
        Self {
            id: "scripted".to_string(),
            fragments,
            request_error: None,
            stream_error_after: None,
            cancel_after: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Replay `text` as `parts` fragments
    pub fn from_text(text: &str, parts: usize) -> Self {
        Self::new(split_fragments(text, parts))
    }

    /// Fail `send_request` with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        let mut model = Self::new(Vec::new());
        model.request_error = Some(message.into());
        model
    }

    /// Fail the stream after `count` fragments
    #[must_use]
    pub fn with_stream_error_after(mut self, count: usize, message: impl Into<String>) -> Self {
        self.stream_error_after = Some((count, message.into()));
        self
    }

    /// Fire the request's cancellation token while producing fragment `count`
    ///
    /// Simulates the user pressing stop right after that fragment arrives.
    #[must_use]
    pub fn with_cancel_after(mut self, count: usize) -> Self {
        self.cancel_after = Some(count);
        self
    }

    /// Prompts received so far
    pub fn requests(&self) -> Vec<Vec<PromptMessage>> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ModelHandle for ScriptedModel {
    fn id(&self) -> &str {
        &self.id
    }

    async fn send_request(
        &self,
        messages: Vec<PromptMessage>,
        cancel: CancellationToken,
    ) -> Result<FragmentStream, ModelError> {
        self.requests.lock().push(messages);

        if let Some(message) = &self.request_error {
            return Err(ModelError::Request(message.clone()));
        }

        let mut items: Vec<Result<String, ModelError>> =
            self.fragments.iter().cloned().map(Ok).collect();
        if let Some((count, message)) = &self.stream_error_after {
            items.truncate(*count);
            items.push(Err(ModelError::Stream(message.clone())));
        }

        let cancel_after = self.cancel_after;
        let stream = futures::stream::iter(items.into_iter().enumerate()).map(move |(index, item)| {
            if cancel_after == Some(index + 1) {
                cancel.cancel();
            }
            item
        });

        Ok(stream.boxed())
    }
}

/// Provider over a fixed model list
#[derive(Default)]
pub struct ScriptedProvider {
    models: Vec<Arc<dyn ModelHandle>>,
    selection_error: Option<String>,
    selections: AtomicUsize,
}

impl ScriptedProvider {
    /// Provider with no models
    pub fn empty() -> Self {
        Self::default()
    }

    /// Provider offering one model
    pub fn with_model(model: Arc<dyn ModelHandle>) -> Self {
        Self {
            models: vec![model],
            ..Self::default()
        }
    }

    /// Provider whose selection fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            selection_error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Number of `select_models` calls
    pub fn selections(&self) -> usize {
        self.selections.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    async fn select_models(
        &self,
        _selector: &ModelSelector,
    ) -> Result<Vec<Arc<dyn ModelHandle>>, ModelError> {
        self.selections.fetch_add(1, Ordering::SeqCst);
        match &self.selection_error {
            Some(message) => Err(ModelError::Selection(message.clone())),
            None => Ok(self.models.clone()),
        }
    }
}

/// Output surface that records every write
#[derive(Debug, Default)]
pub struct RecordingOutput {
    writes: Mutex<Vec<String>>,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Individual writes, in order
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().clone()
    }

    /// All writes concatenated
    pub fn text(&self) -> String {
        self.writes.lock().concat()
    }
}

impl OutputSurface for RecordingOutput {
    fn write_markdown(&self, text: &str) {
        self.writes.lock().push(text.to_string());
    }
}

/// Human surface that answers with a fixed choice
#[derive(Debug, Default)]
pub struct ScriptedHuman {
    choice: Option<Choice>,
    questions: Mutex<Vec<String>>,
    documents: Mutex<Vec<(String, String)>>,
}

impl ScriptedHuman {
    /// Always pick `choice`
    pub fn choosing(choice: Choice) -> Self {
        Self {
            choice: Some(choice),
            ..Self::default()
        }
    }

    /// Always dismiss the dialog
    pub fn dismissing() -> Self {
        Self::default()
    }

    /// Dialog messages shown so far
    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().clone()
    }

    /// `(content, content_type)` of opened documents
    pub fn documents(&self) -> Vec<(String, String)> {
        self.documents.lock().clone()
    }
}

#[async_trait]
impl HumanInteraction for ScriptedHuman {
    async fn ask_choice(
        &self,
        message: &str,
        _options: &[Choice],
    ) -> Result<Option<Choice>, InteractionError> {
        self.questions.lock().push(message.to_string());
        Ok(self.choice)
    }

    async fn open_document(
        &self,
        content: &str,
        content_type: &str,
    ) -> Result<(), InteractionError> {
        self.documents
            .lock()
            .push((content.to_string(), content_type.to_string()));
        Ok(())
    }
}
