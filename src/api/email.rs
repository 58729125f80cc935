//! Outbound mail delivery abstractions.
//!
//! The OTP issuer only depends on the `Mailer` trait, so the delivery
//! mechanism can be swapped (and faked in tests) without touching the signup
//! flow. `SmtpMailer` talks to a real relay; `LogMailer` is the local dev
//! default and logs the message instead of sending it.

use anyhow::{Context, Result};
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    Message, SmtpTransport, Transport,
};
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

/// Mail delivery abstraction used by the OTP issuer.
pub trait Mailer: Send + Sync {
    /// Deliver a message or return an error so the caller can report the
    /// failure to the user.
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}

/// Local dev mailer that logs the payload instead of sending real email.
#[derive(Clone, Debug)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        info!(to_email = %to, subject = %subject, body = %body, "mail send stub");
        Ok(())
    }
}

/// SMTP relay mailer for production delivery.
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build a relay transport with credentials.
    ///
    /// # Errors
    /// Returns an error if the relay host or sender identity is invalid.
    pub fn new(host: &str, username: String, password: &SecretString, from: &str) -> Result<Self> {
        let creds = Credentials::new(username, password.expose_secret().to_string());

        let transport = SmtpTransport::relay(host)
            .with_context(|| format!("Invalid SMTP relay host: {host}"))?
            .credentials(creds)
            .build();

        let from = from
            .parse::<Mailbox>()
            .with_context(|| format!("Invalid mail-from address: {from}"))?;

        Ok(Self { transport, from })
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        let to = to
            .parse::<Mailbox>()
            .with_context(|| format!("Invalid recipient address: {to}"))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .context("Failed to build mail message")?;

        self.transport
            .send(&message)
            .context("Failed to send mail through SMTP relay")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_mailer_always_succeeds() {
        let mailer = LogMailer;
        assert!(mailer
            .send("alice@walchandsangli.ac.in", "subject", "body")
            .is_ok());
    }

    #[test]
    fn smtp_mailer_rejects_invalid_from() {
        let result = SmtpMailer::new(
            "smtp.gmail.com",
            "user".to_string(),
            &SecretString::from("password"),
            "not a mailbox",
        );
        assert!(result.is_err());
    }

    #[test]
    fn smtp_mailer_accepts_named_from() {
        let result = SmtpMailer::new(
            "smtp.gmail.com",
            "user".to_string(),
            &SecretString::from("password"),
            "Campus Mart <no-reply@walchandsangli.ac.in>",
        );
        assert!(result.is_ok());
    }
}
