//! `specialist` - run the Test Specialist in a terminal
//!
//! Replays a recorded model response through the full turn: streaming,
//! proposal extraction and the human-in-the-loop checkpoint.

mod replay;
mod terminal;

use anyhow::Context;
use clap::{value_parser, Arg, ArgMatches, Command};
use replay::ReplayProvider;
use specialist_chat::{
    AssistantConfig, CancellationToken, ChatRequest, FileContext, TestSpecialist, TurnStatus,
};
use specialist_proposal::{parse_proposals, render_preview};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use terminal::{StdoutOutput, TerminalHuman};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("specialist")
        .version(specialist_chat::VERSION)
        .about("The Test Specialist: testing answers with human-approved code changes")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("ask")
                .about("Run one chat turn against a recorded model response")
                .arg(
                    Arg::new("prompt")
                        .long("prompt")
                        .required(true)
                        .help("What to ask the assistant"),
                )
                .arg(
                    Arg::new("response")
                        .long("response")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("File holding the model response to replay"),
                )
                .arg(
                    Arg::new("file")
                        .long("file")
                        .value_parser(value_parser!(PathBuf))
                        .help("File to attach as the active editor document"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("Assistant config (TOML)"),
                )
                .arg(
                    Arg::new("delay-ms")
                        .long("delay-ms")
                        .default_value("0")
                        .value_parser(value_parser!(u64))
                        .help("Pause between streamed fragments"),
                )
                .arg(
                    Arg::new("preview-dir")
                        .long("preview-dir")
                        .value_parser(value_parser!(PathBuf))
                        .help("Where \"Review First\" writes the preview (default: temp dir)"),
                ),
        )
        .subcommand(
            Command::new("preview")
                .about("Extract proposals from a response and print the preview")
                .arg(
                    Arg::new("response")
                        .long("response")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("File holding the model response"),
                ),
        )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();

    match matches.subcommand() {
        Some(("ask", args)) => {
            let status = ask(args).await?;
            std::process::exit(match status {
                TurnStatus::NoModels | TurnStatus::Failed { .. } => 1,
                _ => 0,
            });
        }
        Some(("preview", args)) => {
            let path = required_path(args, "response")?;
            let response = read(path)?;
            let proposals = parse_proposals(&response);
            tracing::info!("Extracted {} proposals", proposals.len());
            let mut out = std::io::stdout().lock();
            out.write_all(render_preview(&proposals).as_bytes())
                .and_then(|()| out.flush())
                .context("writing preview")?;
            Ok(())
        }
        _ => unreachable!("subcommand_required"),
    }
}

async fn ask(args: &ArgMatches) -> anyhow::Result<TurnStatus> {
    let config = match args.get_one::<PathBuf>("config") {
        Some(path) => AssistantConfig::load(path)?,
        None => AssistantConfig::default(),
    };
    tracing::info!(
        participant = %config.participant_id,
        model = %format!("{}/{}", config.model.vendor, config.model.family),
        "Starting assistant"
    );

    let response = read(required_path(args, "response")?)?;
    let delay = Duration::from_millis(args.get_one::<u64>("delay-ms").copied().unwrap_or(0));
    let preview_dir = args
        .get_one::<PathBuf>("preview-dir")
        .cloned()
        .unwrap_or_else(std::env::temp_dir);

    let prompt = args
        .get_one::<String>("prompt")
        .context("missing --prompt")?;
    let mut request = ChatRequest::new(prompt.as_str());
    if let Some(path) = args.get_one::<PathBuf>("file") {
        request = request.with_file_context(file_context(path)?);
    }

    let cancel = CancellationToken::new();
    request = request.with_cancellation(cancel.clone());
    tokio::spawn(interrupt(cancel.clone()));

    let assistant = TestSpecialist::new(
        config,
        Arc::new(ReplayProvider::new(response, delay)),
        Arc::new(
            TerminalHuman::new(
                tokio::io::BufReader::new(tokio::io::stdin()),
                std::io::stdout(),
                preview_dir,
            )
            .with_cancellation(cancel),
        ),
    );

    let result = assistant.handle(request, &StdoutOutput).await;

    let json = serde_json::to_string_pretty(&result)?;
    let mut out = std::io::stdout().lock();
    writeln!(out, "\n{json}")
        .and_then(|()| out.flush())
        .context("writing turn result")?;
    Ok(result.status)
}

/// First Ctrl-C cancels the turn, a second one exits
async fn interrupt(cancel: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_err() {
        return;
    }
    tracing::info!("Interrupted, cancelling turn");
    cancel.cancel();

    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::warn!("Interrupted again, exiting");
        std::process::exit(130);
    }
}

fn required_path<'a>(args: &'a ArgMatches, name: &str) -> anyhow::Result<&'a PathBuf> {
    args.get_one::<PathBuf>(name)
        .with_context(|| format!("missing --{name}"))
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn file_context(path: &Path) -> anyhow::Result<FileContext> {
    let content = read(path)?;
    Ok(FileContext::new(
        path.display().to_string(),
        content,
        language_id(path),
    ))
}

/// Editor-style language id from a file extension
fn language_id(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()).unwrap_or_default() {
        "rs" => "rust",
        "ts" | "tsx" => "typescript",
        "js" | "jsx" | "mjs" => "javascript",
        "py" => "python",
        "go" => "go",
        "java" => "java",
        "cs" => "csharp",
        "md" => "markdown",
        _ => "plaintext",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn ask_arguments() {
        let matches = cli()
            .try_get_matches_from([
                "specialist",
                "ask",
                "--prompt",
                "add tests",
                "--response",
                "reply.md",
                "--delay-ms",
                "25",
            ])
            .unwrap();
        let (name, args) = matches.subcommand().unwrap();

        assert_eq!(name, "ask");
        assert_eq!(args.get_one::<String>("prompt").unwrap(), "add tests");
        assert_eq!(args.get_one::<u64>("delay-ms"), Some(&25));
        assert!(args.get_one::<PathBuf>("file").is_none());
    }

    #[test]
    fn ask_requires_response() {
        assert!(cli()
            .try_get_matches_from(["specialist", "ask", "--prompt", "x"])
            .is_err());
    }

    #[test]
    fn language_ids() {
        assert_eq!(language_id(Path::new("src/lib.rs")), "rust");
        assert_eq!(language_id(Path::new("app.test.ts")), "typescript");
        assert_eq!(language_id(Path::new("Makefile")), "plaintext");
    }

    #[test]
    fn file_context_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sum.py");
        std::fs::write(&path, "def sum(a, b): return a + b\n").unwrap();

        let context = file_context(&path).unwrap();
        assert_eq!(context.content_type, "python");
        assert!(context.content.starts_with("def sum"));
        assert!(context.file_name.ends_with("sum.py"));
    }
}
