//! Terminal output and interaction surfaces

use async_trait::async_trait;
use specialist_chat::{Choice, HumanInteraction, InteractionError, OutputSurface};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Writes markdown straight to stdout
#[derive(Debug, Default)]
pub(crate) struct StdoutOutput;

impl OutputSurface for StdoutOutput {
    fn write_markdown(&self, text: &str) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
            tracing::warn!("Failed to write response: {}", e);
        }
    }
}

/// Line-oriented input paired with the writer its prompts go to
#[derive(Debug)]
struct Console<R, W> {
    input: R,
    output: W,
}

/// Asks on a line-oriented input, saves previews under `preview_dir`
///
/// Prompt text goes to `output`. A write failure is reported as an
/// [`InteractionError`] so the gate can resolve the turn instead of the
/// process dying on a closed pipe.
#[derive(Debug)]
pub(crate) struct TerminalHuman<R, W> {
    console: Mutex<Console<R, W>>,
    preview_dir: PathBuf,
    cancel: CancellationToken,
}

impl<R, W> TerminalHuman<R, W> {
    pub(crate) fn new(input: R, output: W, preview_dir: impl Into<PathBuf>) -> Self {
        Self {
            console: Mutex::new(Console { input, output }),
            preview_dir: preview_dir.into(),
            cancel: CancellationToken::new(),
        }
    }

    /// Stop waiting for an answer once `cancel` fires
    #[must_use]
    pub(crate) fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

fn write_menu(output: &mut impl Write, message: &str, options: &[Choice]) -> std::io::Result<()> {
    writeln!(output, "\n{message}")?;
    for (index, option) in options.iter().enumerate() {
        writeln!(output, "  [{}] {}", index + 1, option)?;
    }
    write!(output, "> ")?;
    output.flush()
}

#[async_trait]
impl<R, W> HumanInteraction for TerminalHuman<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    async fn ask_choice(
        &self,
        message: &str,
        options: &[Choice],
    ) -> Result<Option<Choice>, InteractionError> {
        let mut console = self.console.lock().await;
        let Console { input, output } = &mut *console;

        write_menu(output, message, options)
            .map_err(|e| InteractionError::Prompt(e.to_string()))?;

        let mut line = String::new();
        let read = tokio::select! {
            biased;
            () = self.cancel.cancelled() => {
                tracing::debug!("Cancelled while waiting for a choice");
                return Ok(None);
            }
            read = input.read_line(&mut line) => {
                read.map_err(|e| InteractionError::Prompt(e.to_string()))?
            }
        };

        if read == 0 {
            tracing::debug!("Input closed, treating as dismissed");
            return Ok(None);
        }
        Ok(parse_choice(&line, options))
    }

    async fn open_document(
        &self,
        content: &str,
        content_type: &str,
    ) -> Result<(), InteractionError> {
        let path = save_document(&self.preview_dir, content, content_type)
            .map_err(|e| InteractionError::Document(e.to_string()))?;

        let mut console = self.console.lock().await;
        writeln!(console.output, "\nPreview written to {}", path.display())
            .and_then(|()| console.output.flush())
            .map_err(|e| InteractionError::Document(e.to_string()))
    }
}

/// Persist `content` as a uniquely named file under `dir`
fn save_document(dir: &Path, content: &str, content_type: &str) -> std::io::Result<PathBuf> {
    let suffix = if content_type == "markdown" { ".md" } else { ".txt" };
    let mut file = tempfile::Builder::new()
        .prefix("proposed-changes-")
        .suffix(suffix)
        .tempfile_in(dir)?;
    file.write_all(content.as_bytes())?;

    let (_, path) = file.keep().map_err(|e| e.error)?;
    Ok(path)
}

/// Accepts an option number, a label, or a label's first letter
pub(crate) fn parse_choice(input: &str, options: &[Choice]) -> Option<Choice> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(number) = input.parse::<usize>() {
        return number.checked_sub(1).and_then(|i| options.get(i)).copied();
    }

    if let Some(choice) = Choice::from_label(input).filter(|c| options.contains(c)) {
        return Some(choice);
    }

    let mut chars = input.chars();
    match (chars.next(), chars.next()) {
        (Some(first), None) => options.iter().copied().find(|option| {
            option
                .label()
                .chars()
                .next()
                .is_some_and(|c| c.eq_ignore_ascii_case(&first))
        }),
        _ => None,
    }
}
