//! Server action: build runtime state from CLI arguments and start the API.

use crate::api::{
    self,
    email::{LogMailer, Mailer, SmtpMailer},
    handlers::auth::AuthConfig,
};
use crate::cli::actions::Action;
use anyhow::Result;
use secrecy::SecretString;
use std::sync::Arc;
use tracing::info;

/// Validated server arguments produced by dispatch.
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub email_domain: String,
    pub otp_ttl_seconds: u64,
    pub session_ttl_seconds: i64,
    pub frontend_base_url: String,
    pub smtp_host: Option<String>,
    pub smtp_username: Option<String>,
    pub smtp_password: SecretString,
    pub mail_from: String,
}

impl std::fmt::Debug for Args {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Args")
            .field("port", &self.port)
            .field("dsn", &self.dsn)
            .field("email_domain", &self.email_domain)
            .field("otp_ttl_seconds", &self.otp_ttl_seconds)
            .field("session_ttl_seconds", &self.session_ttl_seconds)
            .field("frontend_base_url", &self.frontend_base_url)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"***")
            .field("mail_from", &self.mail_from)
            .finish()
    }
}

/// Handle the server action
///
/// # Errors
/// Returns an error if the mailer cannot be constructed or the server fails to start
pub async fn handle(action: Action) -> Result<()> {
    let Action::Server(args) = action;

    let config = AuthConfig::new(args.email_domain, args.frontend_base_url)
        .with_otp_ttl_seconds(args.otp_ttl_seconds)
        .with_session_ttl_seconds(args.session_ttl_seconds)
        .with_mail_from(args.mail_from);

    // SMTP relay when configured, otherwise log-only delivery for local dev
    let mailer: Arc<dyn Mailer> = match args.smtp_host {
        Some(host) => Arc::new(SmtpMailer::new(
            &host,
            args.smtp_username.unwrap_or_default(),
            &args.smtp_password,
            config.mail_from(),
        )?),
        None => {
            info!("No SMTP host configured, OTP mail will be logged");
            Arc::new(LogMailer)
        }
    };

    api::new(args.port, &args.dsn, config, mailer).await?;

    Ok(())
}
