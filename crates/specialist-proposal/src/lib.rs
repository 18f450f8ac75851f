//! Test Specialist change proposals
//!
//! The boundary between free-form model output and the structured edits a
//! human is asked to approve.
//!
//! # Core Operations
//!
//! - **Extract**: scan a full model response for `**PROPOSED_CHANGE:**`
//!   segments and turn each well-formed one into a [`ChangeProposal`]
//! - **Preview**: render the proposals as a markdown review document
//!
//! # Architecture
//!
//! ```text
//! response text → split on marker → per-segment scan → Vec<ChangeProposal> → render_preview → markdown
//! ```
//!
//! # Example
//!
//! ```rust
//! use specialist_proposal::{parse_proposals, render_preview};
//!
//! let response = "**PROPOSED_CHANGE:** Add null check.\n\n```ts\nif (!x) return;\n```\n";
//! let proposals = parse_proposals(response);
//!
//! assert_eq!(proposals.len(), 1);
//! assert_eq!(proposals[0].language(), "ts");
//!
//! let document = render_preview(&proposals);
//! assert!(document.starts_with("# Proposed Changes"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod parser;
pub mod preview;
pub mod proposal;

pub use error::ProposalError;
pub use parser::{parse_proposals, CHANGE_MARKER};
pub use preview::render_preview;
pub use proposal::{ChangeProposal, DEFAULT_LANGUAGE};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with change proposals
    pub use crate::error::ProposalError;
    pub use crate::parser::{parse_proposals, CHANGE_MARKER};
    pub use crate::preview::render_preview;
    pub use crate::proposal::{ChangeProposal, DEFAULT_LANGUAGE};
}
