//! Operator input: visible line prompts and hidden password entry.
//!
//! The [`Prompter`] trait is the only way the rest of the crate talks to
//! the terminal, so the collector and the confirmation gate can be driven
//! by [`ScriptedPrompter`] in tests.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::error::PromptError;

/// Source of operator answers.
///
/// Both methods return `Ok(None)` when the input stream is closed.
pub trait Prompter {
    /// Print `label` and read one visible line, without its line terminator.
    fn read_line(&mut self, label: &str) -> Result<Option<String>, PromptError>;

    /// Print `label` and read one line without echoing it.
    fn read_hidden(&mut self, label: &str) -> Result<Option<String>, PromptError>;
}

/// Interactive prompter bound to the process stdin/stdout.
///
/// Hidden input goes through `rpassword`, which reads from the controlling
/// terminal with echo disabled.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for TerminalPrompter {
    fn read_line(&mut self, label: &str) -> Result<Option<String>, PromptError> {
        let read_failed = |e: io::Error| PromptError::ReadFailed {
            label: label.to_string(),
            message: e.to_string(),
        };

        let mut stdout = io::stdout().lock();
        write!(stdout, "{}: ", label).map_err(read_failed)?;
        stdout.flush().map_err(read_failed)?;
        drop(stdout);

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line).map_err(read_failed)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(strip_line_ending(line)))
    }

    fn read_hidden(&mut self, label: &str) -> Result<Option<String>, PromptError> {
        match rpassword::prompt_password(format!("{}: ", label)) {
            Ok(secret) => Ok(Some(secret)),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(PromptError::ReadFailed {
                label: label.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

/// Remove the trailing `\n` or `\r\n` left by `read_line`.
fn strip_line_ending(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

/// Prompter that replays a fixed list of answers.
///
/// Visible and hidden prompts consume from the same queue, in order. Every
/// label asked is recorded so tests can assert which questions were posed.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// Labels of every prompt issued so far.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    /// Number of answers not consumed yet.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, label: &str) -> Option<String> {
        self.asked.push(label.to_string());
        self.answers.pop_front()
    }
}

impl Prompter for ScriptedPrompter {
    fn read_line(&mut self, label: &str) -> Result<Option<String>, PromptError> {
        Ok(self.next(label))
    }

    fn read_hidden(&mut self, label: &str) -> Result<Option<String>, PromptError> {
        Ok(self.next(label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_line_ending_handles_unix_and_windows() {
        assert_eq!(strip_line_ending("yes\n".to_string()), "yes");
        assert_eq!(strip_line_ending("yes\r\n".to_string()), "yes");
        assert_eq!(strip_line_ending("yes".to_string()), "yes");
        assert_eq!(strip_line_ending("\n".to_string()), "");
    }

    #[test]
    fn strip_line_ending_keeps_inner_whitespace() {
        assert_eq!(strip_line_ending(" yes \n".to_string()), " yes ");
    }

    #[test]
    fn scripted_prompter_replays_in_order_and_records_labels() {
        let mut prompter = ScriptedPrompter::new(["alice@apache.org", "secret"]);

        assert_eq!(
            prompter.read_line("Apache Email").unwrap(),
            Some("alice@apache.org".to_string())
        );
        assert_eq!(
            prompter.read_hidden("Apache password").unwrap(),
            Some("secret".to_string())
        );
        assert_eq!(prompter.read_line("extra").unwrap(), None);

        assert_eq!(
            prompter.asked(),
            &["Apache Email", "Apache password", "extra"]
        );
        assert_eq!(prompter.remaining(), 0);
    }
}
