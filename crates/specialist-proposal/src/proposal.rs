//! The change proposal value object

use crate::error::ProposalError;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Language recorded when a fence carries no language tag
pub const DEFAULT_LANGUAGE: &str = "text";

/// A single code edit suggested by the model
///
/// Proposals are read-only once built. `explanation` and `new_code` are
/// guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeProposal {
    explanation: String,
    new_code: String,
    language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    old_code: Option<String>,
}

impl ChangeProposal {
    /// Build a proposal, trimming `explanation` and `new_code`
    ///
    /// A missing or empty `language` falls back to [`DEFAULT_LANGUAGE`].
    ///
    /// # Errors
    /// - [`ProposalError::EmptyExplanation`] / [`ProposalError::EmptyCode`]
    ///   when either part is blank
    /// - [`ProposalError::InvalidLanguage`] for a tag outside `[A-Za-z0-9_]`
    pub fn new(
        explanation: impl AsRef<str>,
        new_code: impl AsRef<str>,
        language: Option<&str>,
    ) -> Result<Self, ProposalError> {
        let explanation = explanation.as_ref().trim();
        if explanation.is_empty() {
            return Err(ProposalError::EmptyExplanation);
        }

        let new_code = new_code.as_ref().trim();
        if new_code.is_empty() {
            return Err(ProposalError::EmptyCode);
        }

        let language = match language {
            Some(tag) if !tag.is_empty() => {
                if !tag.bytes().all(is_word_byte) {
                    return Err(ProposalError::InvalidLanguage(tag.to_string()));
                }
                tag.to_string()
            }
            _ => DEFAULT_LANGUAGE.to_string(),
        };

        Ok(Self {
            explanation: explanation.to_string(),
            new_code: new_code.to_string(),
            language,
            file_path: None,
            old_code: None,
        })
    }

    /// With target file
    #[inline]
    #[must_use]
    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// With the code being replaced
    #[inline]
    #[must_use]
    pub fn with_old_code(mut self, code: impl Into<String>) -> Self {
        self.old_code = Some(code.into());
        self
    }

    /// Why the change is proposed
    #[inline]
    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Replacement code
    #[inline]
    #[must_use]
    pub fn new_code(&self) -> &str {
        &self.new_code
    }

    /// Fence language tag
    #[inline]
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// File the change targets, if known
    #[inline]
    #[must_use]
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Code being replaced, if known
    #[inline]
    #[must_use]
    pub fn old_code(&self) -> Option<&str> {
        self.old_code.as_deref()
    }
}

/// `\w` in the ASCII sense
#[inline]
pub(crate) fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
