//! Core types for the chat turn
//!
//! Defines:
//! - The incoming request and its file context
//! - Prompt messages sent to the model
//! - Confirmation choices and outcomes
//! - The normalized turn result returned to the host

use crate::error::ModelErrorKind;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use ulid::Ulid;

/// Unique turn identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TurnId(pub Ulid);

impl TurnId {
    /// Generate new turn ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for TurnId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TurnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The document open in the editor when the user asked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContext {
    /// File name or path as the editor reports it
    pub file_name: String,
    /// Full document text
    pub content: String,
    /// Editor language id (e.g. "typescript")
    pub content_type: String,
}

impl FileContext {
    /// Create file context
    #[inline]
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        content: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
            content_type: content_type.into(),
        }
    }
}

/// One user utterance to handle
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Literal user text
    pub prompt: String,
    /// Active editor document, if any
    pub file_context: Option<FileContext>,
    /// Signalled when the user stops the response
    pub cancel: CancellationToken,
}

impl ChatRequest {
    /// Create request with no file context and a fresh cancellation token
    #[inline]
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            file_context: None,
            cancel: CancellationToken::new(),
        }
    }

    /// With active file
    #[inline]
    #[must_use]
    pub fn with_file_context(mut self, context: FileContext) -> Self {
        self.file_context = Some(context);
        self
    }

    /// With caller-owned cancellation token
    #[inline]
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Author of a prompt message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

/// Message submitted to a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

impl PromptMessage {
    /// User-authored message
    #[inline]
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Options offered by the confirmation dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Choice {
    /// Approve the proposals
    Apply,
    /// Show the full preview before deciding
    ReviewFirst,
    /// Reject the proposals
    Cancel,
}

impl Choice {
    /// All options, in dialog order
    pub const ALL: [Choice; 3] = [Choice::Apply, Choice::ReviewFirst, Choice::Cancel];

    /// Button label
    #[inline]
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Choice::Apply => "Apply",
            Choice::ReviewFirst => "Review First",
            Choice::Cancel => "Cancel",
        }
    }

    /// Resolve a button label back to its choice
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|choice| choice.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl std::fmt::Display for Choice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// What the human decided about a set of proposals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationOutcome {
    /// Changes may be applied
    Approved,
    /// Preview opened; not approved yet
    ReviewRequested,
    /// Cancelled, dismissed, or nothing to confirm
    Declined,
}

impl ConfirmationOutcome {
    /// Whether mutation may now be performed
    #[inline]
    #[must_use]
    pub fn is_approved(self) -> bool {
        self == Self::Approved
    }
}

impl From<ConfirmationOutcome> for TurnStatus {
    fn from(outcome: ConfirmationOutcome) -> Self {
        match outcome {
            ConfirmationOutcome::Approved => TurnStatus::Approved,
            ConfirmationOutcome::ReviewRequested => TurnStatus::ReviewRequested,
            ConfirmationOutcome::Declined => TurnStatus::Declined,
        }
    }
}

/// How a turn ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStatus {
    /// Response streamed, no proposals found
    Answered,
    /// Proposals approved
    Approved,
    /// Preview shown, approval pending out of band
    ReviewRequested,
    /// Proposals declined
    Declined,
    /// User stopped the response
    Cancelled,
    /// No model available
    NoModels,
    /// Model or internal failure
    Failed { kind: ModelErrorKind },
}

/// Host chat-result metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnMetadata {
    /// Slash command that triggered the turn (empty for free text)
    pub command: String,
}

/// Normalized terminal record of a turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResult {
    pub id: TurnId,
    pub status: TurnStatus,
    /// Proposals extracted from the response
    pub proposal_count: usize,
    /// User-visible diagnostic for failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
    pub metadata: TurnMetadata,
}

impl TurnResult {
    /// Create result without diagnostic
    #[inline]
    #[must_use]
    pub fn new(id: TurnId, status: TurnStatus, proposal_count: usize) -> Self {
        Self {
            id,
            status,
            proposal_count,
            diagnostic: None,
            metadata: TurnMetadata::default(),
        }
    }

    /// With diagnostic
    #[inline]
    #[must_use]
    pub fn with_diagnostic(mut self, diagnostic: impl Into<String>) -> Self {
        self.diagnostic = Some(diagnostic.into());
        self
    }

    /// Whether the human approved the proposed changes
    #[inline]
    #[must_use]
    pub fn is_approved(&self) -> bool {
        self.status == TurnStatus::Approved
    }
}
