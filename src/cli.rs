//! Command-line interface for release-mailer using clap.
//!
//! Global options identify the operator and the release; each subcommand
//! selects one email type. Option names keep the underscore spelling used
//! by the release guide (`--apache_email`, `--version_rc`, ...).

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::{ENV_CONFIG_PATH, SecretString};
use crate::params::SessionInput;

/// Environment fallback for `--version`.
pub const ENV_VERSION: &str = "SUPERSET_VERSION";
/// Environment fallback for `--version_rc`.
pub const ENV_VERSION_RC: &str = "SUPERSET_VERSION_RC";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format (default).
    #[default]
    Text,
    /// Structured JSON format.
    Json,
}

/// Welcome to the release email CLI.
///
/// Renders a release email, shows it for confirmation, then sends it
/// through the project mail relay.
#[derive(Parser, Debug)]
#[command(name = "release-mailer")]
#[command(about = "Send release vote, vote result and announcement emails")]
pub struct Cli {
    /// Your Apache email, used as the SMTP sender (From).
    #[arg(long = "apache_email")]
    pub apache_email: Option<String>,

    /// Your LDAP Apache username.
    #[arg(long = "apache_username")]
    pub apache_username: Option<String>,

    /// Your LDAP Apache password. Prompted with hidden input when omitted.
    #[arg(long = "apache_password")]
    pub apache_password: Option<String>,

    /// Release version, e.g. 3.1.0.
    #[arg(long = "version", env = ENV_VERSION)]
    pub version: Option<String>,

    /// Release candidate label, e.g. rc1.
    #[arg(long = "version_rc", env = ENV_VERSION_RC)]
    pub version_rc: Option<String>,

    /// Path to an optional YAML configuration file.
    #[arg(short = 'c', long = "config", env = ENV_CONFIG_PATH)]
    pub config: Option<PathBuf>,

    /// Directory holding the email templates (overrides the configuration).
    #[arg(long = "templates-dir")]
    pub templates_dir: Option<PathBuf>,

    /// Validate configuration and templates, then exit.
    #[arg(long = "validate")]
    pub validate: bool,

    /// Log format: text or json.
    #[arg(long = "log-format", value_enum, default_value_t = LogFormat::Text, env = "LOG_FORMAT")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Email to send.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Call the PMC vote on a release candidate.
    #[command(name = "vote_pmc")]
    VotePmc(ReceiverArgs),

    /// Announce the result of the PMC vote.
    #[command(name = "result_pmc")]
    ResultPmc(ResultArgs),

    /// Announce the release.
    #[command(name = "announce")]
    Announce(ReceiverArgs),
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiverArgs {
    /// The receiver email (To:). Defaults to the project dev list.
    #[arg(long = "receiver_email")]
    pub receiver_email: Option<String>,
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultArgs {
    #[command(flatten)]
    pub receiver: ReceiverArgs,

    /// Comma separated people with a +1 binding vote (ex: Max,Grace,Krist).
    #[arg(long = "vote_bindings")]
    pub vote_bindings: Option<String>,

    /// Comma separated people with a +1 non binding vote (ex: Ville).
    #[arg(long = "vote_nonbindings")]
    pub vote_nonbindings: Option<String>,

    /// Comma separated people with a -1 vote (ex: John).
    #[arg(long = "vote_negatives")]
    pub vote_negatives: Option<String>,

    /// Permalink to the vote thread.
    #[arg(long = "vote_thread")]
    pub vote_thread: Option<String>,
}

impl Cli {
    /// Global inputs for the parameter collector.
    pub fn session_input(&self) -> SessionInput {
        SessionInput {
            email: self.apache_email.clone(),
            username: self.apache_username.clone(),
            password: self.apache_password.clone().map(SecretString::new),
            version: self.version.clone(),
            version_rc: self.version_rc.clone(),
        }
    }
}
