//! Turn-local conversation state
//!
//! A [`ConversationTurn`] lives for exactly one handler invocation. Nothing in
//! it crosses turns.

use crate::error::TurnStateError;
use crate::state::{validate_transition, TurnState};
use crate::types::{FileContext, TurnId};
use specialist_proposal::{parse_proposals, ChangeProposal};

/// One request/response exchange
#[derive(Debug)]
pub struct ConversationTurn {
    id: TurnId,
    state: TurnState,
    user_prompt: String,
    file_context: Option<FileContext>,
    response: String,
    fragment_count: usize,
    proposals: Vec<ChangeProposal>,
}

impl ConversationTurn {
    /// Start a turn in [`TurnState::Idle`]
    #[must_use]
    pub fn new(user_prompt: impl Into<String>, file_context: Option<FileContext>) -> Self {
        Self {
            id: TurnId::new(),
            state: TurnState::Idle,
            user_prompt: user_prompt.into(),
            file_context,
            response: String::new(),
            fragment_count: 0,
            proposals: Vec::new(),
        }
    }

    /// Move to `to` if the transition is allowed
    pub fn advance(&mut self, to: TurnState) -> Result<(), TurnStateError> {
        validate_transition(self.state, to)?;
        tracing::debug!(turn = %self.id, from = ?self.state, ?to, "turn transition");
        self.state = to;
        Ok(())
    }

    /// Move to [`TurnState::Done`]; a no-op when already there
    pub fn finish(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        if let Err(e) = self.advance(TurnState::Done) {
            tracing::error!("Failed to finish turn {}: {}", self.id, e);
        }
    }

    /// Append a streamed fragment to the response buffer
    pub fn push_fragment(&mut self, fragment: &str) {
        self.response.push_str(fragment);
        self.fragment_count += 1;
    }

    /// Run the change parser over the buffered response
    pub fn extract_proposals(&mut self) -> &[ChangeProposal] {
        self.proposals = parse_proposals(&self.response);
        &self.proposals
    }

    /// Turn identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> TurnId {
        self.id
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Literal user utterance
    #[inline]
    #[must_use]
    pub fn user_prompt(&self) -> &str {
        &self.user_prompt
    }

    /// Active editor document, if any
    #[inline]
    #[must_use]
    pub fn file_context(&self) -> Option<&FileContext> {
        self.file_context.as_ref()
    }

    /// Response text accumulated so far
    #[inline]
    #[must_use]
    pub fn response(&self) -> &str {
        &self.response
    }

    /// Fragments received so far
    #[inline]
    #[must_use]
    pub fn fragment_count(&self) -> usize {
        self.fragment_count
    }

    /// Proposals extracted by [`Self::extract_proposals`]
    #[inline]
    #[must_use]
    pub fn proposals(&self) -> &[ChangeProposal] {
        &self.proposals
    }
}
