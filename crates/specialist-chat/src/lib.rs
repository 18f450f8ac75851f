//! Test Specialist chat core
//!
//! The conversation orchestrator that:
//! - Streams a hosted model's answer to the user as it arrives
//! - Extracts proposed code changes from the finished answer
//! - Stops at a human-in-the-loop checkpoint before anything may change
//! - Turns every failure into one readable diagnostic
//!
//! Host capabilities (models, the chat output, dialogs) are injected through
//! the traits in [`collaborators`].
//!
//! # Example
//!
//! ```rust,ignore
//! use specialist_chat::{AssistantConfig, ChatRequest, TestSpecialist};
//!
//! # async fn example(models, human, output) {
//! let assistant = TestSpecialist::new(AssistantConfig::new(), models, human);
//!
//! let request = ChatRequest::new("Write a unit test for parse_date");
//! let result = assistant.handle(request, &output).await;
//!
//! println!("Turn ended as {:?}", result.status);
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod assistant;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod gate;
pub mod prompt;
pub mod state;
pub mod turn;
pub mod types;

// Re-exports for convenience
pub use assistant::TestSpecialist;
pub use collaborators::{FragmentStream, HumanInteraction, ModelHandle, ModelProvider, OutputSurface};
pub use config::{AssistantConfig, ModelSelector};
pub use error::{
    ChatError, ChatResult, ConfigError, InteractionError, ModelError, ModelErrorKind,
    TurnStateError,
};
pub use gate::{summary_message, ConfirmationGate, PREVIEW_CONTENT_TYPE};
pub use state::TurnState;
pub use turn::ConversationTurn;
pub use types::{
    ChatRequest, Choice, ConfirmationOutcome, FileContext, PromptMessage, Role, TurnId,
    TurnMetadata, TurnResult, TurnStatus,
};

pub use specialist_proposal::{ChangeProposal, CHANGE_MARKER};
pub use tokio_util::sync::CancellationToken;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for hosting the Test Specialist
    pub use crate::{
        AssistantConfig, ChatRequest, Choice, FileContext, HumanInteraction, ModelHandle,
        ModelProvider, OutputSurface, TestSpecialist, TurnResult, TurnStatus,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
