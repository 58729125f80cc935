//! Auth handlers and supporting modules.
//!
//! Signup is gated on a one-time password mailed to a campus address. The
//! OTP lives only in memory, a restart discards pending codes. Passwords are
//! stored as Argon2id hashes and sessions as SHA-256 hashes of the opaque
//! bearer tokens handed to clients.

mod crypto;
pub(crate) mod otp;
pub(crate) mod session;
pub(crate) mod signin;
pub(crate) mod signup;
mod state;
mod storage;
pub(crate) mod store;
pub(crate) mod types;
mod utils;

pub use state::{AuthConfig, AuthState};
