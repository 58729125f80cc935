//! API handlers for the campus marketplace.
//!
//! Route handlers are grouped by concern: `auth` for the OTP signup and
//! session flows, `market` for listings and found items, `me` for the
//! authenticated profile, and `health` for liveness.

pub mod auth;
pub mod health;
pub mod market;
pub mod me;
