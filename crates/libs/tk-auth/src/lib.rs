//! Authentication primitives for Ticket-Desk.
//!
//! Provides the two leaf utilities every other part of the system builds on:
//! salted password hashing ([`secret_hash`]) and signed, time-bounded session
//! tokens ([`jwt`]).

pub mod error;
pub mod jwt;
pub mod prelude;
pub mod secret_hash;

/// HTTP header carrying the bearer token.
pub const AUTH_HEADER: &str = "Authorization";
/// Prefix in front of the token value inside [`AUTH_HEADER`].
pub const AUTH_HEADER_PREFIX: &str = "Bearer ";
/// Issuer claim stamped into every token.
pub const ISS: &str = "ticket-desk";
