//! Auth configuration and shared state.

use std::sync::Arc;
use std::time::Duration;

use super::store::OtpStore;
use crate::api::email::Mailer;

const DEFAULT_OTP_TTL_SECONDS: u64 = 5 * 60;
const DEFAULT_SESSION_TTL_SECONDS: i64 = 12 * 60 * 60;
const DEFAULT_MAIL_FROM: &str = "Campus Mart <no-reply@walchandsangli.ac.in>";

#[derive(Clone, Debug)]
pub struct AuthConfig {
    email_domain: String,
    frontend_base_url: String,
    otp_ttl_seconds: u64,
    session_ttl_seconds: i64,
    mail_from: String,
}

impl AuthConfig {
    #[must_use]
    pub fn new(email_domain: String, frontend_base_url: String) -> Self {
        Self {
            email_domain,
            frontend_base_url,
            otp_ttl_seconds: DEFAULT_OTP_TTL_SECONDS,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            mail_from: DEFAULT_MAIL_FROM.to_string(),
        }
    }

    #[must_use]
    pub fn with_otp_ttl_seconds(mut self, seconds: u64) -> Self {
        self.otp_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_mail_from(mut self, mail_from: String) -> Self {
        self.mail_from = mail_from;
        self
    }

    #[must_use]
    pub fn email_domain(&self) -> &str {
        &self.email_domain
    }

    pub(crate) fn frontend_base_url(&self) -> &str {
        &self.frontend_base_url
    }

    #[must_use]
    pub fn otp_ttl(&self) -> Duration {
        Duration::from_secs(self.otp_ttl_seconds)
    }

    pub(crate) fn otp_ttl_seconds(&self) -> u64 {
        self.otp_ttl_seconds
    }

    pub(crate) fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    #[must_use]
    pub fn mail_from(&self) -> &str {
        &self.mail_from
    }
}

/// Process-wide auth state: configuration, the OTP store, and the mail
/// collaborator. The store is owned here exclusively; handlers reach it only
/// through this state.
pub struct AuthState {
    config: AuthConfig,
    otp: OtpStore,
    mailer: Arc<dyn Mailer>,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig, mailer: Arc<dyn Mailer>) -> Self {
        let otp = OtpStore::new(config.otp_ttl());
        Self {
            config,
            otp,
            mailer,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn otp(&self) -> &OtpStore {
        &self.otp
    }

    pub(crate) fn mailer(&self) -> Arc<dyn Mailer> {
        Arc::clone(&self.mailer)
    }
}
