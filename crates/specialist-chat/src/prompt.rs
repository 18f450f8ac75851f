//! Prompt assembly and fixed user-facing text

use crate::error::ModelErrorKind;
use crate::types::{FileContext, PromptMessage};

/// Default instruction prepended to every prompt
pub const SYSTEM_INSTRUCTION: &str = "You are The Test Specialist, an expert in software testing. \
Help the user design, write, review and debug tests: unit, integration and end-to-end tests, \
test data, mocks and fixtures, coverage and flaky-test diagnosis. Be concrete and concise.\n\
\n\
When you want to suggest a code edit, start a new paragraph with **PROPOSED_CHANGE:** followed \
by a one-sentence explanation, then put the complete new code in a single fenced code block \
tagged with its language. Use one **PROPOSED_CHANGE:** per edit. Never claim that a change has \
been applied: the user must approve every change first.";

/// Default banner written before the confirmation dialog
pub const HITL_BANNER: &str = "\n\n---\n\n\
**Human-in-the-loop checkpoint:** The Test Specialist proposed code changes. \
Nothing is modified without your explicit approval, so please review the proposals \
and choose whether to apply them.\n\n";

/// Written when the provider offers no model
pub const NO_MODELS_MESSAGE: &str = "No language model is available. \
Make sure a chat model provider is installed and that you are signed in, then try again.";

/// Closing message after approval
pub const APPROVED_MESSAGE: &str = "\n\n**Changes approved.** They are ready to be applied.\n";

/// Closing message when the changes were not approved
pub const NOT_APPLIED_MESSAGE: &str = "\n\n**Changes not applied.** No files were modified.\n";

/// Build the single user message sent to the model
///
/// Instruction, then the active file (if any), then the literal utterance.
#[must_use]
pub fn build_prompt(
    system_instruction: &str,
    file_context: Option<&FileContext>,
    utterance: &str,
) -> Vec<PromptMessage> {
    let mut text = String::with_capacity(
        system_instruction.len()
            + utterance.len()
            + file_context.map_or(0, |c| c.content.len() + c.file_name.len() + 64),
    );
    text.push_str(system_instruction);
    text.push_str("\n\n");

    if let Some(context) = file_context {
        text.push_str(&file_context_block(context));
    }

    text.push_str(utterance);
    vec![PromptMessage::user(text)]
}

fn file_context_block(context: &FileContext) -> String {
    format!(
        "The user has the file `{}` open in the editor with the following content:\n\n```{}\n{}\n```\n\n",
        context.file_name, context.content_type, context.content
    )
}

/// User-facing diagnostic for a failed turn
#[must_use]
pub fn diagnostic_message(kind: ModelErrorKind, raw: &str) -> String {
    match kind {
        ModelErrorKind::PermissionDenied => format!(
            "**Permission denied:** you do not have access to the language model. ({raw})"
        ),
        ModelErrorKind::ContentFiltered => format!(
            "**Request blocked:** the content was filtered by the model provider. \
             Try rephrasing your question. ({raw})"
        ),
        ModelErrorKind::Other => format!("**Error:** {raw}"),
    }
}
