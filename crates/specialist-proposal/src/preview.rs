//! Markdown preview of proposed changes
//!
//! The rendered document is what a reviewer sees after choosing
//! "Review First". Rendering is pure: the same proposals always produce the
//! same text.

use crate::proposal::ChangeProposal;

const TITLE: &str = "# Proposed Changes\n\n";
const SEPARATOR: &str = "---\n\n";

/// Render proposals as a single markdown document
#[must_use]
pub fn render_preview(proposals: &[ChangeProposal]) -> String {
    let mut document = String::from(TITLE);

    for (index, proposal) in proposals.iter().enumerate() {
        document.push_str(&format!("## Change {}\n\n", index + 1));

        if let Some(path) = proposal.file_path() {
            document.push_str(&format!("**File:** `{}`\n\n", path.display()));
        }

        document.push_str(proposal.explanation());
        document.push_str("\n\n");

        if let Some(old_code) = proposal.old_code() {
            document.push_str("**Current code:**\n\n");
            push_fence(&mut document, proposal.language(), old_code);
            document.push_str("**Proposed code:**\n\n");
        }

        push_fence(&mut document, proposal.language(), proposal.new_code());
        document.push_str(SEPARATOR);
    }

    document
}

fn push_fence(document: &mut String, language: &str, code: &str) {
    document.push_str("```");
    document.push_str(language);
    document.push('\n');
    document.push_str(code);
    document.push_str("\n```\n\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Parser, Tag};

    fn proposal(explanation: &str, code: &str, language: Option<&str>) -> ChangeProposal {
        ChangeProposal::new(explanation, code, language).unwrap()
    }

    #[test]
    fn preview_layout() {
        let proposals = vec![
            proposal("Add null check.", "if (!x) return;", Some("ts")),
            proposal("Log the result.", "print(result)", None),
        ];

        let expected = "# Proposed Changes\n\n\
            ## Change 1\n\n\
            Add null check.\n\n\
            ```ts\nif (!x) return;\n```\n\n\
            ---\n\n\
            ## Change 2\n\n\
            Log the result.\n\n\
            ```text\nprint(result)\n```\n\n\
            ---\n\n";

        assert_eq!(render_preview(&proposals), expected);
    }

    #[test]
    fn preview_includes_optional_fields() {
        let proposals = vec![proposal("Rename.", "new_name()", Some("rust"))
            .with_file_path("src/lib.rs")
            .with_old_code("old_name()")];

        let expected = "# Proposed Changes\n\n\
            ## Change 1\n\n\
            **File:** `src/lib.rs`\n\n\
            Rename.\n\n\
            **Current code:**\n\n\
            ```rust\nold_name()\n```\n\n\
            **Proposed code:**\n\n\
            ```rust\nnew_name()\n```\n\n\
            ---\n\n";

        assert_eq!(render_preview(&proposals), expected);
    }

    #[test]
    fn preview_is_valid_markdown() {
        let proposals = vec![
            proposal("First.", "one();", Some("js")),
            proposal("Second.", "two()", Some("py")),
            proposal("Third.", "three", None),
        ];
        let document = render_preview(&proposals);

        let mut headings = 0;
        let mut fences = Vec::new();
        for event in Parser::new(&document) {
            match event {
                Event::Start(Tag::Heading { level: HeadingLevel::H2, .. }) => headings += 1,
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(lang))) => {
                    fences.push(lang.to_string());
                }
                _ => {}
            }
        }

        assert_eq!(headings, 3);
        assert_eq!(fences, vec!["js", "py", "text"]);
    }

    proptest! {
        #[test]
        fn rendering_is_idempotent(
            parts in proptest::collection::vec(
                ("[A-Za-z][a-z ]{0,20}", "[a-z();]{1,20}", proptest::option::of("[a-z]{1,6}")),
                0..6,
            )
        ) {
            let proposals: Vec<_> = parts
                .iter()
                .map(|(e, c, l)| proposal(e, c, l.as_deref()))
                .collect();

            prop_assert_eq!(render_preview(&proposals), render_preview(&proposals));
        }
    }
}
