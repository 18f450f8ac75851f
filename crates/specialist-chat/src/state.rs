//! Turn state machine
//!
//! `Idle → Dispatched → Streaming → Parsing → (AwaitingConfirmation) → Done`.
//! Any live state may jump straight to `Done` (cancellation, failure, or a
//! response without proposals). `Done` is terminal.

use crate::error::TurnStateError;
use serde::Serialize;

/// Lifecycle position of a single conversational turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    /// Turn created, nothing sent yet
    Idle,
    /// Utterance accepted, selecting a model and building the prompt
    Dispatched,
    /// Forwarding response fragments
    Streaming,
    /// Extracting change proposals from the full response
    Parsing,
    /// Waiting on the human's decision
    AwaitingConfirmation,
    /// Terminal
    Done,
}

impl TurnState {
    /// Whether the turn has finished
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == Self::Done
    }
}

/// Validates a state transition
pub fn validate_transition(from: TurnState, to: TurnState) -> Result<(), TurnStateError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(TurnStateError::IllegalTransition { from, to })
    }
}

/// States reachable from `from` in one step
#[must_use]
pub fn allowed_transitions(from: TurnState) -> &'static [TurnState] {
    use TurnState::*;
    match from {
        Idle => &[Dispatched, Done],
        Dispatched => &[Streaming, Done],
        Streaming => &[Parsing, Done],
        Parsing => &[AwaitingConfirmation, Done],
        AwaitingConfirmation => &[Done],
        Done => &[],
    }
}
