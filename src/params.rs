//! Session parameter collection.
//!
//! Values come from, in order of precedence: an explicit flag, an
//! environment variable (version fields only, resolved by clap before they
//! reach this module), an interactive prompt, then a per-field default.
//! Nothing is validated locally; the relay is the judge of addresses and
//! credentials.

use crate::config::{ProjectConfig, SecretString};
use crate::error::PromptError;
use crate::prompt::Prompter;
use crate::template::TemplateVars;

pub const LABEL_EMAIL: &str = "Apache Email";
pub const LABEL_USERNAME: &str = "Apache username";
pub const LABEL_PASSWORD: &str = "Apache password";
pub const LABEL_VERSION: &str = "Release version";
pub const LABEL_VERSION_RC: &str = "Release candidate";

/// Raw global inputs as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct SessionInput {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub version: Option<String>,
    pub version_rc: Option<String>,
}

/// Operator identity, release identity and the template variables shared by
/// every command. Built once per invocation.
#[derive(Debug, Clone)]
pub struct SessionParams {
    pub email: String,
    pub username: String,
    pub password: SecretString,
    pub version: String,
    pub version_rc: String,
    pub template_vars: TemplateVars,
}

impl SessionParams {
    /// Fill every missing field by prompting, then seed the shared variables.
    ///
    /// # Errors
    ///
    /// Returns a `PromptError` if input cannot be read or closes before a
    /// required value was given.
    pub fn collect(
        input: SessionInput,
        project: &ProjectConfig,
        prompter: &mut dyn Prompter,
    ) -> Result<Self, PromptError> {
        let email = match input.email {
            Some(email) => email,
            None => prompt_required(prompter, LABEL_EMAIL)?,
        };
        let username = match input.username {
            Some(username) => username,
            None => prompt_required(prompter, LABEL_USERNAME)?,
        };
        let password = match input.password {
            Some(password) => password,
            None => SecretString::new(prompt_hidden(prompter, LABEL_PASSWORD)?),
        };
        let version = match input.version {
            Some(version) => version,
            None => prompt_required(prompter, LABEL_VERSION)?,
        };
        let version_rc = match input.version_rc {
            Some(version_rc) => version_rc,
            None => prompt_required(prompter, LABEL_VERSION_RC)?,
        };

        let mut template_vars = TemplateVars::new();
        template_vars.insert_str("project_name", project.name.as_str());
        template_vars.insert_str("project_module", project.module.as_str());
        template_vars.insert_str("project_description", project.description.as_str());
        template_vars.insert_str("version", version.as_str());
        template_vars.insert_str("version_rc", version_rc.as_str());
        template_vars.insert_str("sender_email", email.as_str());

        tracing::info!(
            sender = %email,
            username = %username,
            version = %version,
            version_rc = %version_rc,
            "Session parameters collected"
        );

        Ok(Self {
            email,
            username,
            password,
            version,
            version_rc,
            template_vars,
        })
    }
}

/// Split a comma separated list of names, trimming each one.
///
/// An empty string is an empty list, never a list holding one empty name.
///
/// ```
/// use release_mailer::params::parse_list;
///
/// assert_eq!(parse_list("Max, Grace,Krist"), vec!["Max", "Grace", "Krist"]);
/// assert!(parse_list("").is_empty());
/// ```
pub fn parse_list(input: &str) -> Vec<String> {
    if input.is_empty() {
        return Vec::new();
    }
    input.split(',').map(|name| name.trim().to_string()).collect()
}

/// Empty answers a required prompt accepts before giving up.
///
/// `rpassword` reports end of input on the terminal as an empty line, so
/// an unbounded loop would never end once the terminal is gone.
pub const MAX_EMPTY_ANSWERS: usize = 3;

/// Prompt until a non-empty answer is given.
pub fn prompt_required(prompter: &mut dyn Prompter, label: &str) -> Result<String, PromptError> {
    ask_until_answered(label, || prompter.read_line(label))
}

/// Hidden variant of [`prompt_required`].
pub fn prompt_hidden(prompter: &mut dyn Prompter, label: &str) -> Result<String, PromptError> {
    ask_until_answered(label, || prompter.read_hidden(label))
}

fn ask_until_answered(
    label: &str,
    mut ask: impl FnMut() -> Result<Option<String>, PromptError>,
) -> Result<String, PromptError> {
    for _ in 0..MAX_EMPTY_ANSWERS {
        match ask()? {
            Some(answer) if !answer.is_empty() => return Ok(answer),
            Some(_) => tracing::debug!(label, "Empty answer, asking again"),
            None => {
                return Err(PromptError::Closed {
                    label: label.to_string(),
                });
            }
        }
    }
    Err(PromptError::NoAnswer {
        label: label.to_string(),
        attempts: MAX_EMPTY_ANSWERS,
    })
}

/// Prompt showing `default`; an empty answer selects it.
pub fn prompt_with_default(
    prompter: &mut dyn Prompter,
    label: &str,
    default: &str,
) -> Result<String, PromptError> {
    let shown = if default.is_empty() {
        format!("{} []", label)
    } else {
        format!("{} [{}]", label, default)
    };
    match prompter.read_line(&shown)? {
        Some(answer) if !answer.is_empty() => Ok(answer),
        Some(_) => Ok(default.to_string()),
        None => Err(PromptError::Closed {
            label: label.to_string(),
        }),
    }
}

/// Use `flag` if given, otherwise ask with a default.
pub fn flag_or_prompt(
    flag: Option<String>,
    prompter: &mut dyn Prompter,
    label: &str,
    default: &str,
) -> Result<String, PromptError> {
    match flag {
        Some(value) => Ok(value),
        None => prompt_with_default(prompter, label, default),
    }
}
