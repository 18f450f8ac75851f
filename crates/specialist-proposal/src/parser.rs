//! Change proposal extraction
//!
//! Two-phase scan over a complete model response:
//!
//! 1. Split the text on [`CHANGE_MARKER`]. Each marker opens a segment that
//!    ends at the next marker or the end of the text, so one segment can never
//!    swallow the code of the following one.
//! 2. Scan each segment on its own for an explanation and the first fenced
//!    code block.
//!
//! Extraction is best effort: a segment without an explanation or without a
//! closed, non-empty code block is skipped silently.

use crate::proposal::{is_word_byte, ChangeProposal};

/// Marker the model is instructed to put in front of every proposed change
pub const CHANGE_MARKER: &str = "**PROPOSED_CHANGE:**";

const FENCE: &str = "```";

/// Extract every well-formed change proposal, in source order
#[must_use]
pub fn parse_proposals(response: &str) -> Vec<ChangeProposal> {
    segments(response)
        .enumerate()
        .filter_map(|(index, segment)| {
            let proposal = parse_segment(segment);
            if proposal.is_none() {
                tracing::trace!(segment = index, "dropping malformed proposal segment");
            }
            proposal
        })
        .collect()
}

/// Text following each marker, up to the next marker
fn segments(response: &str) -> impl Iterator<Item = &str> {
    // Anything before the first marker is ordinary prose
    response.split(CHANGE_MARKER).skip(1)
}

fn parse_segment(segment: &str) -> Option<ChangeProposal> {
    let block = FencedBlock::find(segment)?;
    ChangeProposal::new(&segment[..block.start], block.body, Some(block.language)).ok()
}

/// First fenced region of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FencedBlock<'a> {
    /// Byte offset of the opening fence
    start: usize,
    /// Word characters directly after the opening fence (may be empty)
    language: &'a str,
    /// Lines after the opener up to the closing fence, untrimmed
    body: &'a str,
}

impl<'a> FencedBlock<'a> {
    fn find(text: &'a str) -> Option<Self> {
        let start = text.find(FENCE)?;
        let after_open = &text[start + FENCE.len()..];

        let tag_len = after_open.bytes().take_while(|b| is_word_byte(*b)).count();
        let (language, rest) = after_open.split_at(tag_len);

        let close = rest.find(FENCE)?;
        let inner = &rest[..close];
        // The rest of the opener line is info string, not code
        let body = match inner.find('\n') {
            Some(newline) => &inner[newline + 1..],
            None => inner,
        };

        Some(Self {
            start,
            language,
            body,
        })
    }
}
