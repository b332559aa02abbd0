use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// A line-oriented source of user answers.
///
/// `Ok(None)` means the source is exhausted (EOF).
pub trait InputSource {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

/// Blocking reads from stdin, with the prompt written to stdout first
pub struct StdinInput {
    stdin: io::Stdin,
}

impl StdinInput {
    pub fn new() -> Self {
        Self { stdin: io::stdin() }
    }
}

impl Default for StdinInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for StdinInput {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        let mut line = String::new();
        let read = self.stdin.lock().read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Pre-recorded answers, consumed front to back
#[derive(Debug, Default)]
pub struct ScriptedInput {
    answers: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Prompts shown so far, in order
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl InputSource for ScriptedInput {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.answers.pop_front())
    }
}

/// "yes" or "y" in any case, surrounding whitespace ignored
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "yes" | "y")
}

/// Clean up a typed or pasted path: whitespace, then surrounding double quotes
pub fn normalize_path_input(raw: &str) -> PathBuf {
    PathBuf::from(raw.trim().trim_matches('"'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_affirmative() {
        for yes in ["yes", "y", "YES", "Y", " Yes ", "yEs\n"] {
            assert!(is_affirmative(yes), "{yes:?} should be affirmative");
        }
        for no in ["no", "n", "", "yeah", "sure", "yes please", "ye"] {
            assert!(!is_affirmative(no), "{no:?} should not be affirmative");
        }
    }

    #[test]
    fn test_normalize_path_input() {
        assert_eq!(normalize_path_input("  resume.pdf \n"), PathBuf::from("resume.pdf"));
        assert_eq!(
            normalize_path_input("\"/home/jane/My Resume.pdf\""),
            PathBuf::from("/home/jane/My Resume.pdf")
        );
        assert_eq!(
            normalize_path_input(" \"C:\\cv.pdf\" "),
            PathBuf::from("C:\\cv.pdf")
        );
    }

    #[test]
    fn test_scripted_input_records_prompts_and_ends() {
        let mut input = ScriptedInput::new(["yes"]);

        assert_eq!(input.read_line("first? ").unwrap(), Some("yes".to_string()));
        assert_eq!(input.read_line("second? ").unwrap(), None);
        assert_eq!(input.prompts(), ["first? ", "second? "]);
    }
}
