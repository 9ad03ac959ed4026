// src/lib.rs
//! release-mailer - Release vote, result and announcement emails over SMTP.

pub mod cli;
pub mod commands;
pub mod config;
pub mod confirm;
pub mod error;
pub mod mailer;
pub mod params;
pub mod prompt;
pub mod template;

// Re-export commonly used types
pub use cli::{Cli, Command, LogFormat};
pub use commands::{ReleaseEmail, check_templates, run_command};
pub use config::{Config, SecretString};
pub use error::{ReleaseMailError, SendError, TemplateError};
pub use mailer::{EmailEnvelope, MailTransport, RecordingTransport, SmtpMailer};
pub use params::{SessionParams, parse_list};
pub use prompt::{Prompter, ScriptedPrompter, TerminalPrompter};
pub use template::{RenderedMessage, TemplateEngine, TemplateVars};
