// Terminal interaction: the prompts used by the first-run configuration
// flow and the spinner shown while an upload is in flight. Prompting sits
// behind the `Prompter` trait so the configuration store can be driven
// from tests without a terminal.

use crate::error::ConfigError;
use dialoguer::{Input, Password};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, IsTerminal, Write};

/// Source of answers for the interactive configuration flow.
pub trait Prompter {
    /// Ask for a visible, single line answer.
    fn text(&mut self, prompt: &str) -> Result<String, ConfigError>;

    /// Ask for a secret. Implementations should not echo the input.
    fn secret(&mut self, prompt: &str) -> Result<String, ConfigError>;
}

/// Prompter for standard input. Uses `dialoguer` on a terminal and plain
/// line reads when stdin is piped or redirected.
#[derive(Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn text(&mut self, prompt: &str) -> Result<String, ConfigError> {
        if !io::stdin().is_terminal() {
            return LinePrompter::new(io::stdin().lock()).text(prompt);
        }
        let answer: String = Input::new()
            .with_prompt(prompt)
            .interact_text()
            .map_err(ConfigError::Prompt)?;
        Ok(answer.trim().to_string())
    }

    fn secret(&mut self, prompt: &str) -> Result<String, ConfigError> {
        if !io::stdin().is_terminal() {
            return LinePrompter::new(io::stdin().lock()).secret(prompt);
        }
        // `Password` hides input in terminal.
        let answer = Password::new()
            .with_prompt(prompt)
            .interact()
            .map_err(ConfigError::Prompt)?;
        Ok(answer.trim().to_string())
    }
}

/// Reads one answer per line from any `BufRead`. End of input is an error,
/// never an empty answer.
pub struct LinePrompter<R> {
    reader: R,
}

impl<R: BufRead> LinePrompter<R> {
    pub fn new(reader: R) -> Self {
        LinePrompter { reader }
    }

    fn read_answer(&mut self, prompt: &str) -> Result<String, ConfigError> {
        print!("{prompt}: ");
        io::stdout().flush().map_err(ConfigError::Prompt)?;

        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .map_err(ConfigError::Prompt)?;
        if read == 0 {
            println!();
            return Err(ConfigError::Prompt(io::ErrorKind::UnexpectedEof.into()));
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead> Prompter for LinePrompter<R> {
    fn text(&mut self, prompt: &str) -> Result<String, ConfigError> {
        self.read_answer(prompt)
    }

    fn secret(&mut self, prompt: &str) -> Result<String, ConfigError> {
        self.read_answer(prompt)
    }
}

/// Show a spinner on stderr. It stays invisible when stderr is not a tty.
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message.to_string());
    spinner.tick();
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn line_prompter_reads_one_answer_per_line() {
        let mut prompter = LinePrompter::new(Cursor::new("octocat\r\n  blog \nghp_x\n"));
        assert_eq!(prompter.text("Github username").unwrap(), "octocat");
        assert_eq!(prompter.text("Repo name").unwrap(), "blog");
        assert_eq!(prompter.secret("Token").unwrap(), "ghp_x");
    }

    #[test]
    fn line_prompter_fails_at_end_of_input() {
        let mut prompter = LinePrompter::new(Cursor::new(""));
        match prompter.secret("Token") {
            Err(ConfigError::Prompt(err)) => assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("expected end of input, got {other:?}"),
        }
    }
}
