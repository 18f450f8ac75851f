//! End-to-end turns against scripted collaborators

use pretty_assertions::assert_eq;
use specialist_chat::prompt::{
    APPROVED_MESSAGE, HITL_BANNER, NOT_APPLIED_MESSAGE, NO_MODELS_MESSAGE, SYSTEM_INSTRUCTION,
};
use specialist_chat::{
    AssistantConfig, ChatRequest, Choice, FileContext, ModelErrorKind, TestSpecialist, TurnStatus,
    PREVIEW_CONTENT_TYPE,
};
use specialist_proposal::{parse_proposals, render_preview};
use specialist_test_utils::{
    split_fragments, RecordingOutput, ScriptedHuman, ScriptedModel, ScriptedProvider,
    NULL_CHECK_RESPONSE,
};
use std::sync::Arc;

struct Harness {
    model: Arc<ScriptedModel>,
    provider: Arc<ScriptedProvider>,
    human: Arc<ScriptedHuman>,
    output: RecordingOutput,
    assistant: TestSpecialist,
}

impl Harness {
    fn new(model: ScriptedModel, human: ScriptedHuman) -> Self {
        let model = Arc::new(model);
        let provider = Arc::new(ScriptedProvider::with_model(model.clone()));
        Self::with_provider(model, provider, human)
    }

    fn with_provider(
        model: Arc<ScriptedModel>,
        provider: Arc<ScriptedProvider>,
        human: ScriptedHuman,
    ) -> Self {
        let human = Arc::new(human);
        let assistant =
            TestSpecialist::new(AssistantConfig::default(), provider.clone(), human.clone());
        Self {
            model,
            provider,
            human,
            output: RecordingOutput::new(),
            assistant,
        }
    }
}

#[test]
fn scenario_a_single_proposal() {
    let proposals = parse_proposals(NULL_CHECK_RESPONSE);

    assert_eq!(proposals.len(), 1);
    assert_eq!(proposals[0].explanation(), "Add null check.");
    assert_eq!(proposals[0].language(), "ts");
    assert_eq!(proposals[0].new_code(), "if (!x) return;");
}

#[test]
fn scenario_b_back_to_back_markers() {
    let text = "**PROPOSED_CHANGE:** Guard input.\n```ts\nif (!x) return;\n```\n\
                **PROPOSED_CHANGE:** Assert output.\n```ts\nexpect(f(1)).toBe(2);\n```";
    let proposals = parse_proposals(text);

    assert_eq!(proposals.len(), 2);
    assert_eq!(proposals[0].new_code(), "if (!x) return;");
    assert_eq!(proposals[1].new_code(), "expect(f(1)).toBe(2);");
    assert!(!proposals[0].new_code().contains("expect"));
}

#[tokio::test]
async fn scenario_c_no_models() {
    let human = Arc::new(ScriptedHuman::choosing(Choice::Apply));
    let provider = Arc::new(ScriptedProvider::empty());
    let assistant = TestSpecialist::new(AssistantConfig::default(), provider.clone(), human.clone());
    let output = RecordingOutput::new();

    let result = assistant.handle(ChatRequest::new("help me test"), &output).await;

    assert_eq!(result.status, TurnStatus::NoModels);
    assert_eq!(result.diagnostic.as_deref(), Some(NO_MODELS_MESSAGE));
    assert_eq!(output.writes(), vec![NO_MODELS_MESSAGE.to_string()]);
    assert_eq!(provider.selections(), 1);
    assert!(human.questions().is_empty());
}

#[tokio::test]
async fn scenario_d_apply_approves() {
    let fragments = split_fragments(NULL_CHECK_RESPONSE, 3);
    assert_eq!(fragments.len(), 3);

    let h = Harness::new(
        ScriptedModel::new(fragments.clone()),
        ScriptedHuman::choosing(Choice::Apply),
    );

    let result = h.assistant.handle(ChatRequest::new("add a guard"), &h.output).await;

    assert_eq!(result.status, TurnStatus::Approved);
    assert!(result.is_approved());
    assert_eq!(result.proposal_count, 1);
    assert!(result.diagnostic.is_none());

    let mut expected = fragments;
    expected.push(HITL_BANNER.to_string());
    expected.push(APPROVED_MESSAGE.to_string());
    assert_eq!(h.output.writes(), expected);

    assert_eq!(h.human.questions().len(), 1);
    assert!(h.human.questions()[0].contains("1. Add null check."));
    assert!(h.human.documents().is_empty());
}

#[tokio::test]
async fn scenario_e_cancel_declines() {
    let h = Harness::new(
        ScriptedModel::from_text(NULL_CHECK_RESPONSE, 3),
        ScriptedHuman::choosing(Choice::Cancel),
    );

    let result = h.assistant.handle(ChatRequest::new("add a guard"), &h.output).await;

    assert_eq!(result.status, TurnStatus::Declined);
    assert!(!result.is_approved());

    let writes = h.output.writes();
    assert_eq!(writes.last().map(String::as_str), Some(NOT_APPLIED_MESSAGE));
    assert!(!writes.iter().any(|w| w == APPROVED_MESSAGE));
    assert!(h.human.documents().is_empty());
}

#[tokio::test]
async fn dismissed_dialog_declines() {
    let h = Harness::new(
        ScriptedModel::from_text(NULL_CHECK_RESPONSE, 2),
        ScriptedHuman::dismissing(),
    );

    let result = h.assistant.handle(ChatRequest::new("add a guard"), &h.output).await;

    assert_eq!(result.status, TurnStatus::Declined);
    assert_eq!(h.human.questions().len(), 1);
}

#[tokio::test]
async fn review_first_opens_preview() {
    let h = Harness::new(
        ScriptedModel::from_text(NULL_CHECK_RESPONSE, 4),
        ScriptedHuman::choosing(Choice::ReviewFirst),
    );

    let result = h.assistant.handle(ChatRequest::new("add a guard"), &h.output).await;

    assert_eq!(result.status, TurnStatus::ReviewRequested);
    let documents = h.human.documents();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].0, render_preview(&parse_proposals(NULL_CHECK_RESPONSE)));
    assert_eq!(documents[0].1, PREVIEW_CONTENT_TYPE);
    assert_eq!(
        h.output.writes().last().map(String::as_str),
        Some(NOT_APPLIED_MESSAGE)
    );
}

#[tokio::test]
async fn cancellation_mid_stream_skips_confirmation() {
    let fragments = split_fragments(NULL_CHECK_RESPONSE, 3);
    let h = Harness::new(
        ScriptedModel::new(fragments.clone()).with_cancel_after(2),
        ScriptedHuman::choosing(Choice::Apply),
    );

    let result = h.assistant.handle(ChatRequest::new("add a guard"), &h.output).await;

    assert_eq!(result.status, TurnStatus::Cancelled);
    assert_eq!(result.proposal_count, 0);
    assert!(result.diagnostic.is_none());
    // Already streamed text stays; nothing after the stop
    assert_eq!(h.output.writes(), fragments[..2].to_vec());
    assert!(h.human.questions().is_empty());
}

#[tokio::test]
async fn cancellation_before_dispatch_streams_nothing() {
    let h = Harness::new(
        ScriptedModel::from_text(NULL_CHECK_RESPONSE, 3),
        ScriptedHuman::choosing(Choice::Apply),
    );
    let request = ChatRequest::new("add a guard");
    request.cancel.cancel();

    let result = h.assistant.handle(request, &h.output).await;

    assert_eq!(result.status, TurnStatus::Cancelled);
    assert!(h.output.writes().is_empty());
    assert!(h.human.questions().is_empty());
}

#[tokio::test]
async fn no_proposals_no_banner() {
    let h = Harness::new(
        ScriptedModel::from_text("Prefer property-based tests for parsers.", 5),
        ScriptedHuman::choosing(Choice::Apply),
    );

    let result = h.assistant.handle(ChatRequest::new("advice?"), &h.output).await;

    assert_eq!(result.status, TurnStatus::Answered);
    assert_eq!(h.output.text(), "Prefer property-based tests for parsers.");
    assert!(!h.output.writes().iter().any(|w| w == HITL_BANNER));
    assert!(h.human.questions().is_empty());
}

#[tokio::test]
async fn malformed_marker_only_counts_as_answer() {
    let h = Harness::new(
        ScriptedModel::from_text("**PROPOSED_CHANGE:** I would add a test here.", 2),
        ScriptedHuman::choosing(Choice::Apply),
    );

    let result = h.assistant.handle(ChatRequest::new("advice?"), &h.output).await;

    assert_eq!(result.status, TurnStatus::Answered);
    assert!(h.human.questions().is_empty());
}

#[tokio::test]
async fn prompt_includes_file_context() {
    let h = Harness::new(
        ScriptedModel::from_text("ok", 1),
        ScriptedHuman::dismissing(),
    );
    let request = ChatRequest::new("Write tests for sum").with_file_context(FileContext::new(
        "src/sum.ts",
        "export const sum = (a: number, b: number) => a + b;",
        "typescript",
    ));

    h.assistant.handle(request, &h.output).await;

    let requests = h.model.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].len(), 1);

    let content = &requests[0][0].content;
    assert!(content.starts_with(SYSTEM_INSTRUCTION));
    assert!(content.contains("`src/sum.ts`"));
    assert!(content.contains("```typescript\nexport const sum"));
    assert!(content.ends_with("Write tests for sum"));
}

#[tokio::test]
async fn permission_error_from_request() {
    let h = Harness::new(
        ScriptedModel::failing("You do not have permission to use this model"),
        ScriptedHuman::choosing(Choice::Apply),
    );

    let result = h.assistant.handle(ChatRequest::new("hi"), &h.output).await;

    assert_eq!(
        result.status,
        TurnStatus::Failed {
            kind: ModelErrorKind::PermissionDenied
        }
    );
    assert_eq!(h.output.writes().len(), 1);
    assert!(h.output.text().contains("You do not have permission to use this model"));
}

#[tokio::test]
async fn filtered_stream_error_after_partial_output() {
    let fragments = split_fragments(NULL_CHECK_RESPONSE, 3);
    let h = Harness::new(
        ScriptedModel::new(fragments.clone())
            .with_stream_error_after(1, "Response blocked by content filter"),
        ScriptedHuman::choosing(Choice::Apply),
    );

    let result = h.assistant.handle(ChatRequest::new("hi"), &h.output).await;

    assert_eq!(
        result.status,
        TurnStatus::Failed {
            kind: ModelErrorKind::ContentFiltered
        }
    );
    let writes = h.output.writes();
    assert_eq!(writes.len(), 2);
    assert_eq!(writes[0], fragments[0]);
    assert!(h.human.questions().is_empty());
}

#[tokio::test]
async fn selection_failure_is_generic() {
    let model = Arc::new(ScriptedModel::from_text("unused", 1));
    let provider = Arc::new(ScriptedProvider::failing("provider crashed"));
    let h = Harness::with_provider(model, provider, ScriptedHuman::dismissing());

    let result = h.assistant.handle(ChatRequest::new("hi"), &h.output).await;

    assert_eq!(
        result.status,
        TurnStatus::Failed {
            kind: ModelErrorKind::Other
        }
    );
    assert_eq!(result.diagnostic.as_deref(), Some("**Error:** provider crashed"));
    assert!(h.model.requests().is_empty());
    assert_eq!(h.provider.selections(), 1);
}

#[tokio::test]
async fn turns_do_not_share_state() {
    let h = Harness::new(
        ScriptedModel::from_text(NULL_CHECK_RESPONSE, 3),
        ScriptedHuman::choosing(Choice::Apply),
    );

    let first = h.assistant.handle(ChatRequest::new("one"), &h.output).await;
    let second = h.assistant.handle(ChatRequest::new("two"), &h.output).await;

    assert_eq!(first.proposal_count, 1);
    assert_eq!(second.proposal_count, 1);
    assert_ne!(first.id, second.id);
    assert_eq!(h.human.questions().len(), 2);
}
