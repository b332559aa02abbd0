use anyhow::{Context, Result};
use tracing::info;

use crate::cli::commands::AnalyzeArgs;
use crate::llm::{LlmClient, LlmConfig};
use crate::pdf::PdfTextExtractor;
use crate::report::TerminalPrinter;
use crate::session::{
    normalize_path_input, AnalysisSession, InputSource, SessionEnd, StdinInput, PATH_PROMPT,
};

pub async fn handle_analyze_command(args: AnalyzeArgs) -> Result<()> {
    let config = LlmConfig::from_env().with_overrides(args.llm.into());
    let client = LlmClient::new(config).context("Invalid LLM configuration")?;

    info!(
        "Using model {} at {}",
        client.config().model,
        client.config().api_url
    );

    let mut input = StdinInput::new();
    let path = match args.pdf {
        Some(path) => path,
        None => match input.read_line(PATH_PROMPT)? {
            Some(raw) => normalize_path_input(&raw),
            None => return Ok(()),
        },
    };

    let mut session = AnalysisSession::new(
        path,
        client,
        PdfTextExtractor::new(),
        input,
        TerminalPrinter::stdout(),
    );

    match session.run().await? {
        SessionEnd::Completed { followups } => {
            info!("Session finished after {} follow-up question(s)", followups);
        }
        SessionEnd::Aborted(reason) => {
            info!("Session ended early: {}", reason);
        }
    }

    Ok(())
}
