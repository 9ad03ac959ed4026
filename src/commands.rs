//! Command dispatcher: the three release emails and their shared pipeline.
//!
//! ```text
//! collect params -> build variables -> render -> confirm -> send
//! ```
//!
//! A missing template stops the run before the preview, a refused preview
//! stops it before the network, and a send failure is final.

use std::io::Write;

use crate::cli::{Command, ReceiverArgs, ResultArgs};
use crate::config::ProjectConfig;
use crate::confirm::confirm;
use crate::error::{PromptError, ReleaseMailError, TemplateError};
use crate::mailer::{EmailEnvelope, MailTransport};
use crate::params::{SessionParams, flag_or_prompt, parse_list};
use crate::prompt::Prompter;
use crate::template::{TemplateEngine, TemplateVars};

pub const LABEL_RECEIVER: &str = "The receiver email (To:)";
pub const LABEL_VOTE_BINDINGS: &str = "A List of people with +1 binding vote (ex: Max,Grace,Krist)";
pub const LABEL_VOTE_NONBINDINGS: &str = "A List of people with +1 non binding vote (ex: Ville)";
pub const LABEL_VOTE_NEGATIVES: &str = "A List of people with -1 vote (ex: John)";

/// Names of every template the dispatcher can render.
pub const TEMPLATE_NAMES: [&str; 3] = ["vote_pmc", "result_pmc", "announce"];

/// A fully resolved email request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseEmail {
    /// `[VOTE]` thread opening the PMC vote on a release candidate.
    VoteCall { receiver_email: String },
    /// `[RESULT][VOTE]` summary of the vote.
    VoteResult {
        receiver_email: String,
        vote_bindings: Vec<String>,
        vote_nonbindings: Vec<String>,
        vote_negatives: Vec<String>,
        vote_thread: String,
    },
    /// `[ANNOUNCE]` of the published release.
    Announce { receiver_email: String },
}

impl ReleaseEmail {
    /// Resolve a parsed subcommand, prompting for anything not given as a flag.
    ///
    /// Empty answers select the defaults: `default_receiver` for the
    /// receiver, empty for vote lists and the thread link.
    pub fn from_command(
        command: Command,
        default_receiver: &str,
        prompter: &mut dyn Prompter,
    ) -> Result<Self, PromptError> {
        match command {
            Command::VotePmc(ReceiverArgs { receiver_email }) => Ok(Self::VoteCall {
                receiver_email: flag_or_prompt(
                    receiver_email,
                    prompter,
                    LABEL_RECEIVER,
                    default_receiver,
                )?,
            }),
            Command::ResultPmc(ResultArgs {
                receiver,
                vote_bindings,
                vote_nonbindings,
                vote_negatives,
                vote_thread,
            }) => {
                let receiver_email = flag_or_prompt(
                    receiver.receiver_email,
                    prompter,
                    LABEL_RECEIVER,
                    default_receiver,
                )?;
                let vote_bindings = flag_or_prompt(vote_bindings, prompter, LABEL_VOTE_BINDINGS, "")?;
                let vote_nonbindings =
                    flag_or_prompt(vote_nonbindings, prompter, LABEL_VOTE_NONBINDINGS, "")?;
                let vote_negatives =
                    flag_or_prompt(vote_negatives, prompter, LABEL_VOTE_NEGATIVES, "")?;
                let thread_label = format!(
                    "Permalink to the vote thread (see https://lists.apache.org/list.html?{})",
                    default_receiver
                );
                let vote_thread = flag_or_prompt(vote_thread, prompter, &thread_label, "")?;

                Ok(Self::VoteResult {
                    receiver_email,
                    vote_bindings: parse_list(&vote_bindings),
                    vote_nonbindings: parse_list(&vote_nonbindings),
                    vote_negatives: parse_list(&vote_negatives),
                    vote_thread,
                })
            }
            Command::Announce(ReceiverArgs { receiver_email }) => Ok(Self::Announce {
                receiver_email: flag_or_prompt(
                    receiver_email,
                    prompter,
                    LABEL_RECEIVER,
                    default_receiver,
                )?,
            }),
        }
    }

    pub fn template_name(&self) -> &'static str {
        match self {
            Self::VoteCall { .. } => "vote_pmc",
            Self::VoteResult { .. } => "result_pmc",
            Self::Announce { .. } => "announce",
        }
    }

    pub fn receiver_email(&self) -> &str {
        match self {
            Self::VoteCall { receiver_email }
            | Self::VoteResult { receiver_email, .. }
            | Self::Announce { receiver_email } => receiver_email,
        }
    }

    /// Add this command's variables on top of the shared session set.
    pub fn apply_vars(&self, vars: &mut TemplateVars) {
        vars.insert_str("receiver_email", self.receiver_email());

        if let Self::VoteResult {
            vote_bindings,
            vote_nonbindings,
            vote_negatives,
            vote_thread,
            ..
        } = self
        {
            vars.insert_list("vote_bindings", vote_bindings.clone());
            vars.insert_list("vote_nonbindings", vote_nonbindings.clone());
            vars.insert_list("vote_negatives", vote_negatives.clone());
            vars.insert_str("vote_thread", vote_thread.as_str());
        }
    }
}

/// Render, confirm and send one release email.
///
/// The session's variables are extended with the command's own before
/// rendering. `out` receives the preview and the success line.
///
/// # Errors
///
/// * `ReleaseMailError::Template` - Template missing or invalid; nothing shown.
/// * `ReleaseMailError::Aborted` - Operator declined; nothing sent.
/// * `ReleaseMailError::Send` - Relay rejected credentials or the session failed.
pub fn run_command(
    session: &mut SessionParams,
    email: &ReleaseEmail,
    engine: &TemplateEngine,
    prompter: &mut dyn Prompter,
    out: &mut dyn Write,
    transport: &dyn MailTransport,
) -> Result<(), ReleaseMailError> {
    let template_name = email.template_name();
    tracing::info!(
        template_name,
        receiver = %email.receiver_email(),
        "Preparing release email"
    );

    email.apply_vars(&mut session.template_vars);
    let message = engine.render(template_name, &session.template_vars)?;

    confirm(&message, prompter, out)?;

    let envelope = EmailEnvelope {
        sender: session.email.clone(),
        receiver: email.receiver_email().to_string(),
        body: message.into_string(),
    };
    transport.send(&envelope)?;

    tracing::info!(template_name, receiver = %envelope.receiver, "Email sent");
    // Already accepted by the relay, so a broken stdout is not a failure.
    if let Err(e) = writeln!(out, "Email sent successfully") {
        tracing::warn!(error = %e, "Could not print success message");
    }
    Ok(())
}

/// Variables covering every field any template may reference, with
/// placeholder values. Used to check templates without a real session.
pub fn sample_vars(project: &ProjectConfig, receiver: &str) -> TemplateVars {
    let mut vars = TemplateVars::new();
    vars.insert_str("project_name", project.name.as_str());
    vars.insert_str("project_module", project.module.as_str());
    vars.insert_str("project_description", project.description.as_str());
    vars.insert_str("version", "0.0.0");
    vars.insert_str("version_rc", "rc0");
    vars.insert_str("sender_email", "committer@apache.org");
    vars.insert_str("receiver_email", receiver);
    vars.insert_list("vote_bindings", Vec::new());
    vars.insert_list("vote_nonbindings", Vec::new());
    vars.insert_list("vote_negatives", Vec::new());
    vars.insert_str("vote_thread", "");
    vars
}

/// Render every template with [`sample_vars`], collecting each failure.
pub fn check_templates(
    engine: &TemplateEngine,
    project: &ProjectConfig,
    receiver: &str,
) -> Result<(), Vec<TemplateError>> {
    let vars = sample_vars(project, receiver);
    let errors: Vec<TemplateError> = TEMPLATE_NAMES
        .iter()
        .filter_map(|name| engine.render(name, &vars).err())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
