use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;

use crate::llm::Completion;

/// Terminal formatting constants
pub const PREVIEW_CHARS: usize = 500;
const SEPARATOR_WIDTH: usize = 40;

/// Bounded preview of extracted text.
///
/// Fewer than 500 chars come back verbatim; anything longer or equal is cut to
/// the first 500 chars with `...` appended.
pub fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None if text.chars().count() == PREVIEW_CHARS => format!("{}...", text),
        None => text.to_string(),
    }
}

/// Writes session output to any sink, stdout in normal use
pub struct TerminalPrinter<W: Write> {
    out: W,
    show_spinner: bool,
}

impl TerminalPrinter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout()).with_spinner(true)
    }
}

impl<W: Write> TerminalPrinter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            show_spinner: false,
        }
    }

    pub fn with_spinner(mut self, show_spinner: bool) -> Self {
        self.show_spinner = show_spinner;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn print_error(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{}", message.red())?;
        self.out.flush()
    }

    pub fn print_notice(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{}", message.yellow())?;
        self.out.flush()
    }

    pub fn print_preview(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "\n{}\n", "Extracted Resume Text Preview:".bright_white().bold())?;
        writeln!(self.out, "{}", preview(text))?;
        self.out.flush()
    }

    pub fn print_status(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "\n{}\n", message.bright_black())?;
        self.out.flush()
    }

    /// Print a completion under a heading; failures are shown in red
    pub fn print_completion(&mut self, heading: &str, completion: &Completion) -> io::Result<()> {
        writeln!(self.out, "{}", heading.bright_white().bold())?;
        writeln!(self.out, "{}", "─".repeat(SEPARATOR_WIDTH).bright_black())?;
        match completion {
            Completion::Reply(text) => writeln!(self.out, "{}", text)?,
            failure => writeln!(self.out, "{}", failure.to_string().red())?,
        }
        self.out.flush()
    }

    /// Spinner on stderr while a request is in flight; hidden when disabled
    pub fn start_spinner(&self, message: &str) -> ProgressBar {
        if !self.show_spinner {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}
