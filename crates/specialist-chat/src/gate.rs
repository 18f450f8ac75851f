//! Human confirmation of proposed changes
//!
//! The only place the core blocks on the human or opens a document. It never
//! touches files: `Approved` only tells the caller that applying is now
//! allowed.

use crate::collaborators::HumanInteraction;
use crate::types::{Choice, ConfirmationOutcome};
use specialist_proposal::{render_preview, ChangeProposal};
use std::sync::Arc;

/// Content type used for the preview document
pub const PREVIEW_CONTENT_TYPE: &str = "markdown";

/// Asks the human to approve, review or cancel a set of proposals
#[derive(Clone)]
pub struct ConfirmationGate {
    human: Arc<dyn HumanInteraction>,
}

impl std::fmt::Debug for ConfirmationGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfirmationGate").finish_non_exhaustive()
    }
}

impl ConfirmationGate {
    /// Create gate over a human interaction surface
    #[inline]
    #[must_use]
    pub fn new(human: Arc<dyn HumanInteraction>) -> Self {
        Self { human }
    }

    /// Resolve exactly one outcome for `proposals`
    ///
    /// An empty slice is declined without showing anything. A dismissed or
    /// failed dialog counts as a decline. Choosing "Review First" opens the
    /// preview and resolves to [`ConfirmationOutcome::ReviewRequested`].
    pub async fn confirm(&self, proposals: &[ChangeProposal]) -> ConfirmationOutcome {
        if proposals.is_empty() {
            return ConfirmationOutcome::Declined;
        }

        let message = summary_message(proposals);
        let choice = match self.human.ask_choice(&message, &Choice::ALL).await {
            Ok(choice) => choice,
            Err(e) => {
                tracing::warn!("Confirmation prompt failed, treating as declined: {}", e);
                None
            }
        };

        let outcome = match choice {
            Some(Choice::Apply) => ConfirmationOutcome::Approved,
            Some(Choice::ReviewFirst) => {
                self.show_preview(proposals).await;
                ConfirmationOutcome::ReviewRequested
            }
            Some(Choice::Cancel) | None => ConfirmationOutcome::Declined,
        };

        tracing::info!(?choice, ?outcome, count = proposals.len(), "Confirmation resolved");
        outcome
    }

    async fn show_preview(&self, proposals: &[ChangeProposal]) {
        let document = render_preview(proposals);
        if let Err(e) = self
            .human
            .open_document(&document, PREVIEW_CONTENT_TYPE)
            .await
        {
            tracing::warn!("Could not open change preview: {}", e);
        }
    }
}

/// Dialog text: count plus numbered explanations
#[must_use]
pub fn summary_message(proposals: &[ChangeProposal]) -> String {
    let noun = if proposals.len() == 1 { "change" } else { "changes" };
    let mut message = format!(
        "The Test Specialist proposes {} {}:\n\n",
        proposals.len(),
        noun
    );

    for (index, proposal) in proposals.iter().enumerate() {
        message.push_str(&format!("{}. {}\n", index + 1, proposal.explanation()));
    }

    message.push_str("\nDo you want to apply these changes?");
    message
}
