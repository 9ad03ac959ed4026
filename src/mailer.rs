//! SMTP mail transmitter.
//!
//! One call to [`MailTransport::send`] is one SMTP session: connect to the
//! relay, upgrade with STARTTLS against the platform trust store,
//! authenticate, submit a single envelope, quit. The session never outlives
//! the call and nothing is retried.
//!
//! # Testability
//!
//! Command code only sees the [`MailTransport`] trait:
//! - Production: [`SmtpMailer`] over lettre's blocking `SmtpTransport`
//! - Testing: [`RecordingTransport`] records envelopes and can simulate failures

use std::cell::RefCell;

use lettre::address::Envelope;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, SmtpTransport, Transport};

use crate::config::{SecretString, SmtpConfig};
use crate::error::SendError;

/// SMTP reply codes that mean the relay refused the credentials.
const AUTH_FAILURE_CODES: [u16; 2] = [534, 535];

/// What is handed to the transport: one sender, one receiver, full message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailEnvelope {
    pub sender: String,
    pub receiver: String,
    /// Complete message text, headers included.
    pub body: String,
}

/// Mail transport abstraction.
pub trait MailTransport {
    /// Send one message.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The relay accepted the message
    /// * `Err(SendError::Authentication)` - Credentials rejected
    /// * `Err(SendError)` - Any other failure
    fn send(&self, envelope: &EmailEnvelope) -> Result<(), SendError>;
}

/// Authenticated STARTTLS submission to a fixed relay.
pub struct SmtpMailer {
    host: String,
    port: u16,
    username: String,
    password: SecretString,
}

impl SmtpMailer {
    pub fn new(smtp: &SmtpConfig, username: &str, password: SecretString) -> Self {
        Self {
            host: smtp.host.clone(),
            port: smtp.port,
            username: username.to_string(),
            password,
        }
    }

    /// Build a non-pooled transport: every send opens and closes its own
    /// connection.
    fn build_transport(&self) -> Result<SmtpTransport, SendError> {
        let builder = SmtpTransport::starttls_relay(&self.host)
            .map_err(|e| SendError::Transport(format!("TLS configuration error: {}", e)))?;

        Ok(builder
            .port(self.port)
            .credentials(Credentials::new(
                self.username.clone(),
                self.password.expose().to_string(),
            ))
            .build())
    }
}

impl MailTransport for SmtpMailer {
    fn send(&self, envelope: &EmailEnvelope) -> Result<(), SendError> {
        let span = tracing::info_span!(
            "smtp_send",
            relay = %self.host,
            port = self.port,
            receiver = %envelope.receiver
        );
        let _guard = span.enter();

        let smtp_envelope = build_envelope(envelope)?;
        let transport = self.build_transport()?;
        let body = to_crlf(&envelope.body);

        tracing::debug!(body_len = body.len(), "Submitting message to relay");
        match transport.send_raw(&smtp_envelope, body.as_bytes()) {
            Ok(response) => {
                tracing::info!(code = %response.code(), "Relay accepted message");
                Ok(())
            }
            Err(e) => {
                let code = e.status().map(u16::from);
                let error = classify_failure(code, e.is_client(), e.to_string());
                tracing::error!(code = ?code, error = %e, "SMTP send failed");
                Err(error)
            }
        }
    }
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password)
            .finish()
    }
}

fn parse_address(role: &'static str, address: &str) -> Result<Address, SendError> {
    address
        .trim()
        .parse()
        .map_err(|e: lettre::address::AddressError| SendError::InvalidAddress {
            role,
            address: address.to_string(),
            message: e.to_string(),
        })
}

fn build_envelope(envelope: &EmailEnvelope) -> Result<Envelope, SendError> {
    let from = parse_address("sender", &envelope.sender)?;
    let to = parse_address("receiver", &envelope.receiver)?;
    Envelope::new(Some(from), vec![to]).map_err(|e| SendError::Transport(e.to_string()))
}

/// Rewrite every line ending as CRLF, the only terminator allowed in DATA.
///
/// Lone `\n` and lone `\r` become `\r\n`; existing `\r\n` pairs are kept
/// as they are. lettre only dot-stuffs after CRLF, so this must run before
/// `send_raw`.
pub fn to_crlf(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 16);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\r\n");
            }
            '\n' => out.push_str("\r\n"),
            other => out.push(other),
        }
    }
    out
}

/// Map an SMTP failure onto the two user-facing classes.
///
/// Authentication: reply 534/535, or a client-side error about the
/// authentication mechanism. Everything else is a transport failure.
pub fn classify_failure(code: Option<u16>, is_client: bool, detail: String) -> SendError {
    let auth_code = code.is_some_and(|c| AUTH_FAILURE_CODES.contains(&c));
    let auth_client = is_client && detail.to_lowercase().contains("authentication");

    if auth_code || auth_client {
        SendError::Authentication { detail }
    } else {
        SendError::Transport(detail)
    }
}

/// Simulated failure for [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulatedFailure {
    Authentication,
    Transport(String),
}

/// Transport that records every envelope instead of sending it.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: RefCell<Vec<EmailEnvelope>>,
    failure: Option<SimulatedFailure>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport whose every send fails with `failure` after being recorded.
    pub fn failing(failure: SimulatedFailure) -> Self {
        Self {
            sent: RefCell::new(Vec::new()),
            failure: Some(failure),
        }
    }

    /// Number of send attempts, successful or not.
    pub fn send_count(&self) -> usize {
        self.sent.borrow().len()
    }

    pub fn sent(&self) -> Vec<EmailEnvelope> {
        self.sent.borrow().clone()
    }
}

impl MailTransport for RecordingTransport {
    fn send(&self, envelope: &EmailEnvelope) -> Result<(), SendError> {
        self.sent.borrow_mut().push(envelope.clone());

        match &self.failure {
            None => Ok(()),
            Some(SimulatedFailure::Authentication) => Err(classify_failure(
                Some(535),
                false,
                "permanent error (535): 5.7.8 Authentication credentials invalid".to_string(),
            )),
            Some(SimulatedFailure::Transport(detail)) => {
                Err(classify_failure(None, false, detail.clone()))
            }
        }
    }
}
