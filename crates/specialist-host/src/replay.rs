//! Model provider that replays a recorded response
//!
//! Stands in for a hosted model: the recorded text is streamed back in
//! word-sized fragments, optionally paced by a fixed delay.

use async_trait::async_trait;
use futures::StreamExt;
use specialist_chat::{
    FragmentStream, ModelError, ModelHandle, ModelProvider, ModelSelector, PromptMessage,
};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Split text into fragments that each end after a whitespace run
pub(crate) fn word_fragments(text: &str) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut current = String::new();
    let mut in_space = false;

    for ch in text.chars() {
        if in_space && !ch.is_whitespace() {
            fragments.push(std::mem::take(&mut current));
        }
        in_space = ch.is_whitespace();
        current.push(ch);
    }
    if !current.is_empty() {
        fragments.push(current);
    }
    fragments
}

#[derive(Debug)]
pub(crate) struct ReplayModel {
    id: String,
    response: String,
    delay: Duration,
}

impl ReplayModel {
    pub(crate) fn new(selector: &ModelSelector, response: String, delay: Duration) -> Self {
        Self {
            id: format!("replay:{}/{}", selector.vendor, selector.family),
            response,
            delay,
        }
    }
}

#[async_trait]
impl ModelHandle for ReplayModel {
    fn id(&self) -> &str {
        &self.id
    }

    async fn send_request(
        &self,
        messages: Vec<PromptMessage>,
        cancel: CancellationToken,
    ) -> Result<FragmentStream, ModelError> {
        tracing::debug!(
            messages = messages.len(),
            prompt_bytes = messages.iter().map(|m| m.content.len()).sum::<usize>(),
            "Replaying recorded response"
        );

        let delay = self.delay;
        let stream = futures::stream::iter(word_fragments(&self.response))
            .then(move |fragment| async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok::<_, ModelError>(fragment)
            })
            .take_until(cancel.cancelled_owned());

        Ok(stream.boxed())
    }
}

/// Offers a single [`ReplayModel`]
#[derive(Debug)]
pub(crate) struct ReplayProvider {
    response: String,
    delay: Duration,
}

impl ReplayProvider {
    pub(crate) fn new(response: String, delay: Duration) -> Self {
        Self { response, delay }
    }
}

#[async_trait]
impl ModelProvider for ReplayProvider {
    async fn select_models(
        &self,
        selector: &ModelSelector,
    ) -> Result<Vec<Arc<dyn ModelHandle>>, ModelError> {
        if self.response.trim().is_empty() {
            return Ok(Vec::new());
        }
        let model: Arc<dyn ModelHandle> =
            Arc::new(ReplayModel::new(selector, self.response.clone(), self.delay));
        Ok(vec![model])
    }
}
