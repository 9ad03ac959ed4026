//! Email templating engine.
//!
//! Each email type is a Jinja2-style template file `<name>.j2` in the
//! configured template directory, rendered with minijinja. Templates carry
//! their own `To:`/`From:`/`Subject:` headers, so the rendered text is the
//! complete message handed to the transport.
//!
//! # Example
//!
//! ```ignore
//! use release_mailer::template::{TemplateEngine, TemplateVars};
//!
//! let engine = TemplateEngine::new("email_templates");
//! let mut vars = TemplateVars::new();
//! vars.insert_str("version", "3.1.0");
//!
//! let message = engine.render("announce", &vars)?;
//! println!("{}", message.as_str());
//! ```

use crate::error::TemplateError;
use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// File extension of template files.
pub const TEMPLATE_EXTENSION: &str = "j2";

/// Named variables passed to a template.
///
/// Values are either strings or lists of strings. Inserting an existing key
/// overwrites it; keys are never removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TemplateVars(Map<String, Value>);

impl TemplateVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_str(&mut self, key: &str, value: impl Into<String>) {
        self.0.insert(key.to_string(), Value::String(value.into()));
    }

    pub fn insert_list(&mut self, key: &str, values: Vec<String>) {
        self.0.insert(
            key.to_string(),
            Value::Array(values.into_iter().map(Value::String).collect()),
        );
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Returns the list stored under `key`, or `None` if absent or not a list.
    pub fn get_list(&self, key: &str) -> Option<Vec<&str>> {
        self.0
            .get(key)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }
}

/// Rendered email text, produced once per command and never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage(String);

impl RenderedMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for RenderedMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Template engine for rendering emails with Jinja2 syntax.
///
/// Templates are read from disk on every render; the set is small and each
/// invocation renders exactly one of them.
pub struct TemplateEngine {
    /// Plain-text environment: lenient undefined, no auto-escape.
    env: Environment<'static>,
    /// Directory holding `<name>.j2` files.
    dir: PathBuf,
}

impl TemplateEngine {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let mut env = Environment::new();
        // Missing variables render as empty strings rather than failing.
        env.set_undefined_behavior(UndefinedBehavior::Lenient);
        env.set_auto_escape_callback(|_| minijinja::AutoEscape::None);
        env.set_keep_trailing_newline(true);

        Self {
            env,
            dir: dir.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing template `name`.
    pub fn template_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, TEMPLATE_EXTENSION))
    }

    /// Read the source of template `name`.
    ///
    /// # Errors
    ///
    /// * `TemplateError::NotFound` - No file for this template.
    /// * `TemplateError::ReadFailed` - The file exists but cannot be read.
    pub fn load(&self, name: &str) -> Result<String, TemplateError> {
        let path = self.template_path(name);
        std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TemplateError::NotFound {
                    name: name.to_string(),
                    path: path.clone(),
                }
            } else {
                TemplateError::ReadFailed {
                    name: name.to_string(),
                    message: format!("{}: {}", path.display(), e),
                }
            }
        })
    }

    /// Render template `name` with `vars`.
    ///
    /// # Errors
    ///
    /// * `TemplateError::NotFound` / `ReadFailed` - Template cannot be loaded.
    /// * `TemplateError::RenderFailed` - Syntax or runtime error in the template.
    pub fn render(
        &self,
        name: &str,
        vars: &TemplateVars,
    ) -> Result<RenderedMessage, TemplateError> {
        tracing::trace!(template_name = %name, dir = %self.dir.display(), "Starting template render");

        let source = self.load(name)?;
        let text = self
            .env
            .render_str(&source, vars)
            .map_err(|e| TemplateError::RenderFailed {
                name: name.to_string(),
                message: e.to_string(),
            })?;

        tracing::debug!(
            template_name = %name,
            body_len = text.len(),
            "Template rendered successfully"
        );
        Ok(RenderedMessage(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn engine_with(templates: &[(&str, &str)]) -> (TempDir, TemplateEngine) {
        let dir = tempfile::tempdir().unwrap();
        for (name, source) in templates {
            fs::write(dir.path().join(format!("{}.j2", name)), source).unwrap();
        }
        let engine = TemplateEngine::new(dir.path());
        (dir, engine)
    }

    // ===================================================================
    // TemplateVars
    // ===================================================================

    #[test]
    fn vars_insert_overwrites_existing_key() {
        let mut vars = TemplateVars::new();
        vars.insert_str("receiver_email", "dev@superset.apache.org");
        vars.insert_str("receiver_email", "private@superset.apache.org");

        assert_eq!(
            serde_json::to_value(&vars).unwrap(),
            serde_json::json!({ "receiver_email": "private@superset.apache.org" })
        );
    }

    #[test]
    fn vars_list_accessors() {
        let mut vars = TemplateVars::new();
        vars.insert_list("vote_bindings", vec!["Max".to_string(), "Grace".to_string()]);
        vars.insert_str("version", "3.1.0");

        assert_eq!(vars.get_list("vote_bindings"), Some(vec!["Max", "Grace"]));
        assert_eq!(vars.get_list("version"), None);
        assert_eq!(vars.get_str("vote_bindings"), None);
        assert!(vars.contains_key("version"));
        assert!(!vars.contains_key("missing"));
    }

    // ===================================================================
    // Rendering
    // ===================================================================

    #[test]
    fn render_substitutes_strings_and_lists() {
        let (_dir, engine) = engine_with(&[(
            "result",
            "Version {{ version }}{% for name in voters %}\n- {{ name }}{% endfor %}",
        )]);
        let mut vars = TemplateVars::new();
        vars.insert_str("version", "3.1.0");
        vars.insert_list("voters", vec!["Max".to_string(), "Grace".to_string()]);

        let message = engine.render("result", &vars).unwrap();

        assert_eq!(message.as_str(), "Version 3.1.0\n- Max\n- Grace");
    }

    #[test]
    fn render_missing_variable_is_empty() {
        let (_dir, engine) = engine_with(&[("t", "[{{ version_rc }}]")]);

        let message = engine.render("t", &TemplateVars::new()).unwrap();

        assert_eq!(message.as_str(), "[]");
    }

    #[test]
    fn render_does_not_escape_markup() {
        let (_dir, engine) = engine_with(&[("t", "{{ link }}")]);
        let mut vars = TemplateVars::new();
        vars.insert_str("link", "https://lists.apache.org/thread/<id>?a=1&b=2");

        let message = engine.render("t", &vars).unwrap();

        assert_eq!(
            message.as_str(),
            "https://lists.apache.org/thread/<id>?a=1&b=2"
        );
    }

    #[test]
    fn render_keeps_trailing_newline() {
        let (_dir, engine) = engine_with(&[("t", "Subject: x\n\nbody\n")]);

        let message = engine.render("t", &TemplateVars::new()).unwrap();

        assert!(message.as_str().ends_with("body\n"));
    }

    #[test]
    fn render_missing_template_is_not_found() {
        let (dir, engine) = engine_with(&[]);

        let err = engine.render("announce", &TemplateVars::new()).unwrap_err();

        match err {
            TemplateError::NotFound { name, path } => {
                assert_eq!(name, "announce");
                assert_eq!(path, dir.path().join("announce.j2"));
            }
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn render_syntax_error_is_render_failed() {
        let (_dir, engine) = engine_with(&[("broken", "{% for x in %}")]);

        let err = engine.render("broken", &TemplateVars::new()).unwrap_err();

        assert!(
            matches!(err, TemplateError::RenderFailed { ref name, .. } if name == "broken"),
            "got {:?}",
            err
        );
    }

    #[test]
    fn template_path_appends_extension() {
        let engine = TemplateEngine::new("email_templates");
        assert_eq!(
            engine.template_path("vote_pmc"),
            PathBuf::from("email_templates/vote_pmc.j2")
        );
        assert_eq!(engine.dir(), Path::new("email_templates"));
    }
}
