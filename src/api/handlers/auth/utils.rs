//! Small helpers for email validation and token handling.

use anyhow::{Context, Result};
use base64::Engine;
use rand::{rngs::OsRng, Rng, RngCore};
use regex::Regex;
use sha2::{Digest, Sha256};

/// Normalize an email for lookup/uniqueness checks.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Lightweight email sanity check applied before any store or mail work.
pub(crate) fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

/// Check that a normalized email belongs to the allowed institutional domain.
///
/// The local part must be non-empty; the suffix alone is not a valid address.
pub(crate) fn allowed_domain(email_normalized: &str, domain_suffix: &str) -> bool {
    !domain_suffix.is_empty()
        && email_normalized.len() > domain_suffix.len()
        && email_normalized.ends_with(domain_suffix)
}

/// Generate a 6-digit numeric code, uniformly over `100000..=999999`.
pub(crate) fn generate_otp_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

/// Create a new opaque session token.
/// The raw value is only returned to the client; the database stores a hash.
pub(crate) fn generate_session_token() -> Result<String> {
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate session token")?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
}

/// Hash a session token so raw values never touch the database.
/// The hash is used for lookups when the bearer token is presented.
pub(crate) fn hash_session_token(token: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().to_vec()
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(
            normalize_email(" Alice@Walchandsangli.AC.IN "),
            "alice@walchandsangli.ac.in"
        );
    }

    #[test]
    fn valid_email_accepts_simple() {
        assert!(valid_email("user@walchandsangli.ac.in"));
    }

    #[test]
    fn valid_email_rejects_missing_at_and_spaces() {
        assert!(!valid_email("user.walchandsangli.ac.in"));
        assert!(!valid_email("user name@walchandsangli.ac.in"));
    }

    #[test]
    fn allowed_domain_accepts_institutional_suffix() {
        assert!(allowed_domain(
            "alice@walchandsangli.ac.in",
            "@walchandsangli.ac.in"
        ));
    }

    #[test]
    fn allowed_domain_rejects_foreign_and_degenerate_emails() {
        assert!(!allowed_domain("bob@gmail.com", "@walchandsangli.ac.in"));
        assert!(!allowed_domain("", "@walchandsangli.ac.in"));
        // The bare suffix has no local part.
        assert!(!allowed_domain(
            "@walchandsangli.ac.in",
            "@walchandsangli.ac.in"
        ));
    }

    #[test]
    fn generate_otp_code_is_six_digits() {
        for _ in 0..64 {
            let code = generate_otp_code();
            assert_eq!(code.len(), 6);
            let value: u32 = code.parse().expect("code should be numeric");
            assert!((100_000..=999_999).contains(&value));
        }
    }

    #[test]
    fn generate_session_token_round_trip() {
        let decoded_len = generate_session_token()
            .ok()
            .and_then(|token| URL_SAFE_NO_PAD.decode(token.as_bytes()).ok())
            .map(|bytes| bytes.len());
        assert_eq!(decoded_len, Some(32));
    }

    #[test]
    fn hash_session_token_stable() {
        let first = hash_session_token("token");
        let second = hash_session_token("token");
        let different = hash_session_token("other");
        assert_eq!(first, second);
        assert_ne!(first, different);
    }

    #[derive(Debug)]
    struct TestDbError {
        code: Option<&'static str>,
    }

    impl fmt::Display for TestDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "test database error")
        }
    }

    impl StdError for TestDbError {}

    impl DatabaseError for TestDbError {
        fn message(&self) -> &'static str {
            "test database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            self.code.map(Cow::Borrowed)
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::UniqueViolation
        }
    }

    #[test]
    fn is_unique_violation_matches_sqlstate() {
        let err = sqlx::Error::Database(Box::new(TestDbError {
            code: Some("23505"),
        }));
        assert!(is_unique_violation(&err));

        let err = sqlx::Error::Database(Box::new(TestDbError {
            code: Some("99999"),
        }));
        assert!(!is_unique_violation(&err));

        let err = sqlx::Error::RowNotFound;
        assert!(!is_unique_violation(&err));
    }
}
