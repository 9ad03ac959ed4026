//! Centralized error types for release-mailer using thiserror.
//!
//! Each component owns one error enum. [`ReleaseMailError`] aggregates them
//! for the single top-level handler in `main`, which is the only place that
//! terminates the process.

use std::path::PathBuf;

use thiserror::Error;

/// Errors related to configuration loading and validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load config file: {0}")]
    LoadError(String),
    #[error("invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised while reading operator input.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("failed to read input for '{label}': {message}")]
    ReadFailed { label: String, message: String },
    #[error("input closed while waiting for '{label}'")]
    Closed { label: String },
    #[error("no value given for '{label}' after {attempts} attempts")]
    NoAnswer { label: String, attempts: usize },
}

/// Errors related to template resolution and rendering.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("template '{name}' not found at {}", .path.display())]
    NotFound { name: String, path: PathBuf },
    #[error("cannot read template '{name}': {message}")]
    ReadFailed { name: String, message: String },
    #[error("template '{name}' render failed: {message}")]
    RenderFailed { name: String, message: String },
}

/// Errors related to the SMTP session.
#[derive(Error, Debug)]
pub enum SendError {
    /// Credentials rejected by the relay.
    #[error("SMTP user authentication error, email not sent!")]
    Authentication { detail: String },
    #[error("SMTP exception: {0}")]
    Transport(String),
    #[error("SMTP exception: invalid {role} address '{address}': {message}")]
    InvalidAddress {
        role: &'static str,
        address: String,
        message: String,
    },
}

/// Terminal outcome of one command invocation other than success.
#[derive(Error, Debug)]
pub enum ReleaseMailError {
    /// The operator declined the preview. Not a failure, a deliberate stop.
    #[error("Exit by user request")]
    Aborted,
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Send(#[from] SendError),
}

impl ReleaseMailError {
    /// Process exit code reported by the top-level handler.
    pub fn exit_code(&self) -> i32 {
        1
    }
}
