//! Configuration loading and validation for release-mailer.
//!
//! The defaults reproduce the project's fixed deployment (relay, project
//! identity, template directory, mailing list); a YAML file may override any
//! of them.

mod secret;
mod types;

pub use secret::SecretString;
pub use types::{
    Config, DEFAULT_PROJECT_DESCRIPTION, DEFAULT_PROJECT_MODULE, DEFAULT_PROJECT_NAME,
    DEFAULT_RECEIVER, DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT, DEFAULT_TEMPLATES_DIR,
    DefaultReceiver, ENV_CONFIG_PATH, ProjectConfig, SmtpConfig, TemplatesDir,
};

#[cfg(test)]
mod tests;
