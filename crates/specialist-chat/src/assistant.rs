//! The Test Specialist conversation orchestrator
//!
//! Drives one turn at a time:
//! - Selects a model and assembles the prompt
//! - Streams the response to the output surface while buffering it
//! - Extracts change proposals from the full response
//! - Puts any proposals in front of the human before reporting the outcome

use crate::collaborators::{HumanInteraction, ModelHandle, ModelProvider, OutputSurface};
use crate::config::AssistantConfig;
use crate::error::{ChatError, ChatResult};
use crate::gate::ConfirmationGate;
use crate::prompt::{
    build_prompt, diagnostic_message, APPROVED_MESSAGE, NOT_APPLIED_MESSAGE, NO_MODELS_MESSAGE,
};
use crate::state::TurnState;
use crate::turn::ConversationTurn;
use crate::types::{ChatRequest, ConfirmationOutcome, TurnResult, TurnStatus};
use futures::StreamExt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// The chat participant
///
/// Owns its configuration and collaborators; holds no per-turn state, so
/// one instance serves every turn.
pub struct TestSpecialist {
    /// Configuration
    config: AssistantConfig,
    /// Model source
    models: Arc<dyn ModelProvider>,
    /// Human approval
    gate: ConfirmationGate,
}

impl std::fmt::Debug for TestSpecialist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestSpecialist")
            .field("config", &self.config)
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}

impl TestSpecialist {
    /// Create assistant with injected collaborators
    #[inline]
    #[must_use]
    pub fn new(
        config: AssistantConfig,
        models: Arc<dyn ModelProvider>,
        human: Arc<dyn HumanInteraction>,
    ) -> Self {
        Self {
            config,
            models,
            gate: ConfirmationGate::new(human),
        }
    }

    /// Handle one user utterance
    ///
    /// This is the entry point the host registers. It never fails: model
    /// errors become a single diagnostic written to `output`, and the turn
    /// always ends in [`TurnState::Done`] with a normalized [`TurnResult`].
    pub async fn handle(&self, request: ChatRequest, output: &dyn OutputSurface) -> TurnResult {
        let ChatRequest {
            prompt,
            file_context,
            cancel,
        } = request;

        let mut turn = ConversationTurn::new(prompt, file_context);
        let span = tracing::info_span!("turn", id = %turn.id());

        async {
            tracing::info!(
                has_file = turn.file_context().is_some(),
                "Handling request: {}",
                turn.user_prompt()
            );

            let result = match self.run_turn(&mut turn, &cancel, output).await {
                Ok(status) => TurnResult::new(turn.id(), status, turn.proposals().len()),
                Err(e) => self.report_failure(&turn, e, output),
            };

            turn.finish();
            tracing::info!(status = ?result.status, "Turn finished");
            result
        }
        .instrument(span)
        .await
    }

    /// Idle through AwaitingConfirmation; the caller finishes the turn
    async fn run_turn(
        &self,
        turn: &mut ConversationTurn,
        cancel: &CancellationToken,
        output: &dyn OutputSurface,
    ) -> ChatResult<TurnStatus> {
        turn.advance(TurnState::Dispatched)?;

        // 1. Pick a model and build the prompt
        let model = self.select_model().await?;
        let messages = build_prompt(
            &self.config.system_instruction,
            turn.file_context(),
            turn.user_prompt(),
        );

        // 2. Stream the response
        turn.advance(TurnState::Streaming)?;
        tracing::debug!(model = model.id(), "Sending request");
        let mut fragments = model.send_request(messages, cancel.clone()).await?;

        loop {
            let next = tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                next = fragments.next() => next,
            };

            match next {
                Some(Ok(fragment)) => {
                    output.write_markdown(&fragment);
                    turn.push_fragment(&fragment);
                }
                Some(Err(e)) => return Err(e.into()),
                None => break,
            }
        }

        if cancel.is_cancelled() {
            tracing::info!(
                fragments = turn.fragment_count(),
                "Cancelled while streaming, skipping proposals"
            );
            return Ok(TurnStatus::Cancelled);
        }
        tracing::debug!(
            fragments = turn.fragment_count(),
            bytes = turn.response().len(),
            "Stream complete"
        );

        // 3. Look for proposed changes
        turn.advance(TurnState::Parsing)?;
        let count = turn.extract_proposals().len();
        if count == 0 {
            return Ok(TurnStatus::Answered);
        }
        tracing::info!("Found {} proposed changes", count);

        // 4. Human checkpoint
        turn.advance(TurnState::AwaitingConfirmation)?;
        output.write_markdown(&self.config.hitl_banner);

        let outcome = self.gate.confirm(turn.proposals()).await;
        output.write_markdown(closing_message(outcome));

        Ok(outcome.into())
    }

    /// First model matching the configured selector
    async fn select_model(&self) -> ChatResult<Arc<dyn ModelHandle>> {
        let selector = &self.config.model;
        let models = self.models.select_models(selector).await?;
        tracing::debug!(available = models.len(), "Selected models");

        models.into_iter().next().ok_or_else(|| ChatError::NoModels {
            vendor: selector.vendor.clone(),
            family: selector.family.clone(),
        })
    }

    /// Turn an error into the single user-visible diagnostic
    fn report_failure(
        &self,
        turn: &ConversationTurn,
        error: ChatError,
        output: &dyn OutputSurface,
    ) -> TurnResult {
        let proposal_count = turn.proposals().len();

        if let ChatError::NoModels { .. } = error {
            tracing::warn!("{}", error);
            output.write_markdown(NO_MODELS_MESSAGE);
            return TurnResult::new(turn.id(), TurnStatus::NoModels, proposal_count)
                .with_diagnostic(NO_MODELS_MESSAGE);
        }

        tracing::error!(state = ?turn.state(), "Turn failed: {}", error);

        let kind = error.kind();
        let raw = match &error {
            ChatError::Model(e) => e.message().to_string(),
            other => other.to_string(),
        };
        let diagnostic = diagnostic_message(kind, &raw);
        output.write_markdown(&diagnostic);

        TurnResult::new(turn.id(), TurnStatus::Failed { kind }, proposal_count)
            .with_diagnostic(diagnostic)
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }
}

fn closing_message(outcome: ConfirmationOutcome) -> &'static str {
    match outcome {
        ConfirmationOutcome::Approved => APPROVED_MESSAGE,
        ConfirmationOutcome::ReviewRequested | ConfirmationOutcome::Declined => {
            NOT_APPLIED_MESSAGE
        }
    }
}
