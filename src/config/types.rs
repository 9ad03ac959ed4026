//! Core configuration types and loading.

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable that may point at a configuration file.
pub const ENV_CONFIG_PATH: &str = "RELEASE_MAILER_CONFIG";

/// SMTP relay accepting authenticated submissions from committers.
pub const DEFAULT_SMTP_HOST: &str = "mail-relay.apache.org";

/// Mail submission port (STARTTLS).
pub const DEFAULT_SMTP_PORT: u16 = 587;

pub const DEFAULT_PROJECT_NAME: &str = "Superset";
pub const DEFAULT_PROJECT_MODULE: &str = "superset";
pub const DEFAULT_PROJECT_DESCRIPTION: &str =
    "Apache Superset is a modern, enterprise-ready business intelligence web application";

/// Directory holding the `.j2` email templates, relative to the working directory.
pub const DEFAULT_TEMPLATES_DIR: &str = "email_templates";

/// Project development mailing list.
pub const DEFAULT_RECEIVER: &str = "dev@superset.apache.org";

/// Main configuration structure for release-mailer.
///
/// Every section is optional; an absent file yields [`Config::default`].
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Relay connection settings.
    pub smtp: SmtpConfig,
    /// Fixed project identity fed to every template.
    pub project: ProjectConfig,
    /// Directory containing `vote_pmc.j2`, `result_pmc.j2` and `announce.j2`.
    pub templates_dir: TemplatesDir,
    /// Receiver offered when the operator does not pick one.
    pub default_receiver: DefaultReceiver,
}

/// SMTP relay configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SMTP_HOST.to_string(),
            port: DEFAULT_SMTP_PORT,
        }
    }
}

/// Project identity fields (`project_name`, `project_module`, `project_description`).
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    pub name: String,
    pub module: String,
    pub description: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_PROJECT_NAME.to_string(),
            module: DEFAULT_PROJECT_MODULE.to_string(),
            description: DEFAULT_PROJECT_DESCRIPTION.to_string(),
        }
    }
}

/// Template directory with a project default.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct TemplatesDir(pub PathBuf);

impl Default for TemplatesDir {
    fn default() -> Self {
        Self(PathBuf::from(DEFAULT_TEMPLATES_DIR))
    }
}

/// Default receiver address with a project default.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct DefaultReceiver(pub String);

impl Default for DefaultReceiver {
    fn default() -> Self {
        Self(DEFAULT_RECEIVER.to_string())
    }
}

impl Config {
    /// Load configuration from a file path.
    ///
    /// # Errors
    /// Returns [`ConfigError::LoadError`] if the file cannot be read.
    /// Returns [`ConfigError::ValidationError`] if the YAML is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadError(format!("{}: {}", path.display(), e)))?;

        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text.
    ///
    /// An empty document is the default configuration.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    /// Load from `path` if given, else fall back to built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Validate the whole configuration, collecting every problem.
    ///
    /// # Errors
    /// Returns a `Vec<ConfigError>` containing all validation errors found.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();

        if self.smtp.host.trim().is_empty() {
            errors.push(ConfigError::ValidationError(
                "smtp.host must not be empty".to_string(),
            ));
        }
        if self.smtp.port == 0 {
            errors.push(ConfigError::ValidationError(
                "smtp.port must not be 0".to_string(),
            ));
        }
        if self.project.name.trim().is_empty() {
            errors.push(ConfigError::ValidationError(
                "project.name must not be empty".to_string(),
            ));
        }
        if self.default_receiver.0.trim().is_empty() {
            errors.push(ConfigError::ValidationError(
                "default_receiver must not be empty".to_string(),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir.0
    }

    pub fn default_receiver(&self) -> &str {
        &self.default_receiver.0
    }
}
