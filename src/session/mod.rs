//! Interactive resume analysis session.
//!
//! The session is an explicit state machine driven by [`AnalysisSession::step`]:
//!
//! ```text
//! Idle -> Extracting -> Previewing -> Analyzing -> AwaitingFollowupChoice
//!                                        ^                  |
//!                                        |                  v
//!                                        +---- AskingFollowup        -> Done
//! ```
//!
//! Input, output, text extraction and the LLM are all injected, so transitions
//! can be driven from a terminal or from a test script.

pub mod input;

use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

use crate::llm::prompts::{build_analysis_prompt, build_followup_prompt};
use crate::llm::{ChatCompletion, Completion};
use crate::pdf::{ExtractError, ResumeText, TextExtractor};
use crate::report::TerminalPrinter;

pub use input::{is_affirmative, normalize_path_input, InputSource, ScriptedInput, StdinInput};

pub const PATH_PROMPT: &str = "Enter the path to the resume PDF: ";
pub const FOLLOWUP_CHOICE_PROMPT: &str =
    "\nWould you like to ask a follow-up question regarding resume improvements? (yes/no): ";
pub const FOLLOWUP_QUESTION_PROMPT: &str = "Enter your follow-up question: ";

/// Reasons a session ends before analysis starts
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("File not found: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("Error extracting text from PDF: {0}")]
    Extraction(String),

    #[error("No text extracted from PDF.")]
    EmptyDocument,
}

impl From<ExtractError> for SessionError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::NotFound(path) => SessionError::PathNotFound(path),
            other => SessionError::Extraction(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Extracting,
    Previewing,
    Analyzing,
    AwaitingFollowupChoice,
    AskingFollowup,
    Done,
}

/// How a session finished
#[derive(Debug)]
pub enum SessionEnd {
    /// Analysis ran; `followups` counts follow-up questions sent to the model,
    /// whether or not the reply succeeded
    Completed { followups: usize },
    Aborted(SessionError),
}

/// The most recent successful feedback, used as context for the next follow-up
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionState {
    feedback: Option<String>,
}

impl SessionState {
    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    /// Only successful replies are recorded; failures leave the state untouched
    fn record(&mut self, completion: &Completion) {
        if let Completion::Reply(text) = completion {
            self.feedback = Some(text.clone());
        }
    }
}

pub struct AnalysisSession<C, X, I, W>
where
    C: ChatCompletion,
    X: TextExtractor,
    I: InputSource,
    W: Write,
{
    client: C,
    extractor: X,
    input: I,
    printer: TerminalPrinter<W>,
    path: PathBuf,
    phase: SessionPhase,
    state: SessionState,
    resume: Option<ResumeText>,
    pending_prompt: Option<String>,
    followups: usize,
    outcome: Option<SessionError>,
}

impl<C, X, I, W> AnalysisSession<C, X, I, W>
where
    C: ChatCompletion,
    X: TextExtractor,
    I: InputSource,
    W: Write,
{
    pub fn new(
        path: impl Into<PathBuf>,
        client: C,
        extractor: X,
        input: I,
        printer: TerminalPrinter<W>,
    ) -> Self {
        Self {
            client,
            extractor,
            input,
            printer,
            path: path.into(),
            phase: SessionPhase::Idle,
            state: SessionState::default(),
            resume: None,
            pending_prompt: None,
            followups: 0,
            outcome: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    /// Hand back the input source and output sink
    pub fn into_parts(self) -> (I, W) {
        (self.input, self.printer.into_inner())
    }

    /// Drive the session until it reaches `Done`
    pub async fn run(&mut self) -> io::Result<SessionEnd> {
        while self.phase != SessionPhase::Done {
            self.step().await?;
        }

        Ok(match self.outcome.take() {
            Some(err) => SessionEnd::Aborted(err),
            None => SessionEnd::Completed {
                followups: self.followups,
            },
        })
    }

    /// Perform exactly one transition
    pub async fn step(&mut self) -> io::Result<SessionPhase> {
        let next = match self.phase {
            SessionPhase::Idle => SessionPhase::Extracting,
            SessionPhase::Extracting => self.extract()?,
            SessionPhase::Previewing => self.show_preview()?,
            SessionPhase::Analyzing => self.analyze().await?,
            SessionPhase::AwaitingFollowupChoice => self.await_choice()?,
            SessionPhase::AskingFollowup => self.ask_followup()?,
            SessionPhase::Done => SessionPhase::Done,
        };

        if next != self.phase {
            debug!("Session transition: {:?} -> {:?}", self.phase, next);
        }
        self.phase = next;
        Ok(next)
    }

    fn abort(&mut self, err: SessionError) -> io::Result<SessionPhase> {
        self.printer.print_error(&err.to_string())?;
        self.outcome = Some(err);
        Ok(SessionPhase::Done)
    }

    fn extract(&mut self) -> io::Result<SessionPhase> {
        info!("Extracting text from {}", self.path.display());

        if !self.path.exists() {
            return self.abort(SessionError::PathNotFound(self.path.clone()));
        }

        let resume = match self.extractor.extract(&self.path) {
            Ok(resume) => resume,
            Err(e) => return self.abort(e.into()),
        };

        if resume.is_blank() {
            return self.abort(SessionError::EmptyDocument);
        }

        info!("Extracted {} characters of resume text", resume.char_count());
        self.resume = Some(resume);
        Ok(SessionPhase::Previewing)
    }

    fn show_preview(&mut self) -> io::Result<SessionPhase> {
        let Some(resume) = self.resume.as_ref() else {
            return Ok(SessionPhase::Done);
        };

        self.printer.print_preview(resume.as_str())?;
        self.pending_prompt = Some(build_analysis_prompt(resume.as_str()));
        Ok(SessionPhase::Analyzing)
    }

    async fn analyze(&mut self) -> io::Result<SessionPhase> {
        let Some(prompt) = self.pending_prompt.take() else {
            return Ok(SessionPhase::AwaitingFollowupChoice);
        };

        let (status, heading) = if self.followups == 0 {
            ("Analyzing resume with the language model...", "Model Feedback:")
        } else {
            ("Processing your follow-up question...", "Follow-Up Advice:")
        };

        self.printer.print_status(status)?;
        let spinner = self.printer.start_spinner(status);
        let completion = self.client.complete(&prompt).await;
        spinner.finish_and_clear();

        self.state.record(&completion);
        self.printer.print_completion(heading, &completion)?;
        Ok(SessionPhase::AwaitingFollowupChoice)
    }

    fn await_choice(&mut self) -> io::Result<SessionPhase> {
        match self.input.read_line(FOLLOWUP_CHOICE_PROMPT)? {
            Some(answer) if is_affirmative(&answer) => Ok(SessionPhase::AskingFollowup),
            _ => Ok(SessionPhase::Done),
        }
    }

    fn ask_followup(&mut self) -> io::Result<SessionPhase> {
        let question = self
            .input
            .read_line(FOLLOWUP_QUESTION_PROMPT)?
            .map(|q| q.trim().to_string())
            .unwrap_or_default();

        if question.is_empty() {
            self.printer.print_notice("No question entered. Exiting follow-up.")?;
            return Ok(SessionPhase::Done);
        }

        let prior = self.state.feedback().unwrap_or_default();
        self.pending_prompt = Some(build_followup_prompt(prior, &question));
        self.followups += 1;
        Ok(SessionPhase::Analyzing)
    }
}
