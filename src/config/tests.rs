//! Tests for Config loading and validation.

use super::*;
use crate::error::ConfigError;
use std::path::{Path, PathBuf};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

// ============================================================
// Defaults
// ============================================================

#[test]
fn default_config_matches_project_deployment() {
    let config = Config::default();

    assert_eq!(config.smtp.host, "mail-relay.apache.org");
    assert_eq!(config.smtp.port, 587);
    assert_eq!(config.project.name, "Superset");
    assert_eq!(config.project.module, "superset");
    assert_eq!(config.project.description, DEFAULT_PROJECT_DESCRIPTION);
    assert_eq!(config.templates_dir(), Path::new("email_templates"));
    assert_eq!(config.default_receiver(), "dev@superset.apache.org");
    assert!(config.validate().is_ok());
}

#[test]
fn load_or_default_without_path_uses_defaults() {
    let config = Config::load_or_default(None).unwrap();
    assert_eq!(config, Config::default());
}

// ============================================================
// Loading
// ============================================================

#[test]
fn load_valid_config() {
    let config = Config::load(&fixture_path("config_valid.yaml")).unwrap();

    assert_eq!(config.smtp.host, "smtp.example.org");
    assert_eq!(config.smtp.port, 2525);
    assert_eq!(config.project.name, "Widget");
    assert_eq!(config.project.module, "widget");
    assert_eq!(
        config.project.description,
        "Apache Widget turns gadgets into widgets"
    );
    assert_eq!(
        config.templates_dir(),
        Path::new("/opt/widget/email_templates")
    );
    assert_eq!(config.default_receiver(), "dev@widget.apache.org");
    assert!(config.validate().is_ok());
}

#[test]
fn load_partial_config_keeps_other_defaults() {
    let config = Config::load(&fixture_path("config_partial.yaml")).unwrap();

    assert_eq!(config.smtp.port, 2587);
    assert_eq!(config.smtp.host, DEFAULT_SMTP_HOST);
    assert_eq!(config.project, ProjectConfig::default());
    assert_eq!(config.default_receiver(), DEFAULT_RECEIVER);
}

#[test]
fn load_empty_file_is_default() {
    let config = Config::load(&fixture_path("config_empty.yaml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn load_missing_file_is_load_error() {
    let result = Config::load(&fixture_path("does_not_exist.yaml"));
    match result {
        Err(ConfigError::LoadError(message)) => {
            assert!(message.contains("does_not_exist.yaml"));
        }
        other => panic!("Expected LoadError, got {:?}", other),
    }
}

#[test]
fn load_rejects_unknown_keys() {
    let result = Config::load(&fixture_path("config_unknown_key.yaml"));
    match result {
        Err(ConfigError::ValidationError(message)) => {
            assert!(message.contains("tls"), "message: {}", message);
        }
        other => panic!("Expected ValidationError, got {:?}", other),
    }
}

#[test]
fn from_yaml_rejects_wrong_types() {
    let result = Config::from_yaml("smtp:\n  port: not-a-number\n");
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));
}

// ============================================================
// Validation
// ============================================================

#[test]
fn validate_collects_all_errors() {
    let config = Config::load(&fixture_path("config_invalid.yaml")).unwrap();

    let errors = config.validate().unwrap_err();
    let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();

    assert_eq!(errors.len(), 4, "errors: {:?}", messages);
    assert!(messages.iter().any(|m| m.contains("smtp.host")));
    assert!(messages.iter().any(|m| m.contains("smtp.port")));
    assert!(messages.iter().any(|m| m.contains("project.name")));
    assert!(messages.iter().any(|m| m.contains("default_receiver")));
}

#[test]
fn validate_rejects_whitespace_host() {
    let mut config = Config::default();
    config.smtp.host = "   ".to_string();

    let errors = config.validate().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].to_string().contains("smtp.host"));
}
