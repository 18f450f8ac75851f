//! Error types for change proposals
//!
//! Extraction itself never fails: malformed segments are skipped. These
//! errors only guard direct construction of a [`ChangeProposal`].
//!
//! [`ChangeProposal`]: crate::ChangeProposal

/// Errors raised when a proposal would violate its invariants
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProposalError {
    /// Explanation is empty after trimming
    #[error("proposal explanation is empty")]
    EmptyExplanation,

    /// Proposed code is empty after trimming
    #[error("proposal code is empty")]
    EmptyCode,

    /// Language tag contains characters other than `[A-Za-z0-9_]`
    #[error("invalid language tag: '{0}'")]
    InvalidLanguage(String),
}
