//! Confirmation gate shown before anything touches the network.

use std::io::Write;

use crate::error::{PromptError, ReleaseMailError};
use crate::prompt::Prompter;
use crate::template::RenderedMessage;

/// Answers accepted as "send it". Matched exactly, case included.
pub const AFFIRMATIVE_ANSWERS: [&str; 3] = ["yes", "Yes", "y"];

pub const CONFIRM_LABEL: &str = "Is the Email message ok? (yes/no)";

const DELIMITER: &str = "--------------------------";

pub fn is_affirmative(answer: &str) -> bool {
    AFFIRMATIVE_ANSWERS.contains(&answer)
}

/// Print the framed preview to `out` and ask the operator to approve it.
///
/// # Errors
///
/// * `ReleaseMailError::Aborted` - Any answer outside [`AFFIRMATIVE_ANSWERS`],
///   including an empty line or closed input.
/// * `ReleaseMailError::Prompt` - The preview could not be written or the
///   answer could not be read.
pub fn confirm(
    message: &RenderedMessage,
    prompter: &mut dyn Prompter,
    out: &mut dyn Write,
) -> Result<(), ReleaseMailError> {
    write_preview(message, out).map_err(|e| PromptError::ReadFailed {
        label: CONFIRM_LABEL.to_string(),
        message: format!("cannot display preview: {}", e),
    })?;

    let answer = prompter.read_line(CONFIRM_LABEL)?;
    match answer.as_deref() {
        Some(answer) if is_affirmative(answer) => {
            tracing::debug!("Operator confirmed message");
            Ok(())
        }
        other => {
            tracing::info!(answer = ?other, "Operator declined message");
            Err(ReleaseMailError::Aborted)
        }
    }
}

fn write_preview(message: &RenderedMessage, out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out, "{}", DELIMITER)?;
    writeln!(out, "SMTP Message")?;
    writeln!(out, "{}", DELIMITER)?;
    writeln!(out, "{}", message)?;
    writeln!(out, "{}", DELIMITER)?;
    out.flush()
}
