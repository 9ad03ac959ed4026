//! Secret string wrapper that never appears in logs.

/// Wrapper for the operator's LDAP password.
///
/// The `Debug` and `Display` implementations always show `[REDACTED]`
/// so the value cannot leak through tracing fields or error output.
///
/// # Example
///
/// ```
/// use release_mailer::config::SecretString;
///
/// let secret = SecretString::new("hunter2".to_string());
/// assert_eq!(format!("{:?}", secret), "[REDACTED]");
/// assert_eq!(secret.expose(), "hunter2");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(s: String) -> Self {
        SecretString(s)
    }

    /// Exposes the underlying secret value.
    ///
    /// Only the SMTP credentials builder should call this.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl std::fmt::Display for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        SecretString::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_string_redacts_in_debug_and_display() {
        let secret = SecretString::new("correct-horse-battery".to_string());

        let debug_output = format!("{:?}", secret);
        assert!(!debug_output.contains("correct-horse-battery"));
        assert!(debug_output.contains("[REDACTED]"));

        let display_output = format!("{}", secret);
        assert!(!display_output.contains("correct-horse-battery"));
        assert!(display_output.contains("[REDACTED]"));

        assert_eq!(secret.expose(), "correct-horse-battery");
    }

    #[test]
    fn no_secret_leaked_in_nested_formats() {
        let secret = SecretString::from("s3cr3t-ldap".to_string());

        let representations = [
            format!("{:?}", Some(&secret)),
            format!("{:?}", vec![&secret]),
            format!("{:#?}", secret),
        ];

        for repr in &representations {
            assert!(
                !repr.contains("s3cr3t"),
                "SECURITY VIOLATION: secret found in output: {}",
                repr
            );
        }
    }
}
