//! # Campus Mart (Campus Marketplace API)
//!
//! `campusmart` is the REST backend of a campus marketplace: students list
//! items for sale or report found items, browse and search listings, and
//! manage their own postings.
//!
//! ## Signup (email OTP)
//!
//! Accounts are restricted to a single institutional email domain. Signup is
//! a two-step flow: the client requests a one-time password which is mailed
//! to the address, then resubmits it together with the pending account
//! fields. Codes live in an in-memory store with a 5 minute expiry and are
//! strictly single-use.
//!
//! ## Sessions
//!
//! Sign-in issues an opaque bearer token; only its SHA-256 hash is stored
//! server-side. All listing endpoints require `Authorization: Bearer`.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
