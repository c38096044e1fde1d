//! Web layer for Ticket-Desk.
//!
//! Sits between the HTTP router and the model layer: resolves the request
//! context from bearer tokens ([`ctx`]), gates protected routes
//! ([`mw_auth`]), orchestrates signup/login ([`user`], [`auth_token`]) and
//! implements the ticket handler cores ([`ticket`]). All failures map to the
//! stable status codes defined in [`error`].

pub mod auth_token;
pub mod ctx;
pub mod error;
pub mod mw_auth;
pub mod prelude;
pub mod ticket;
pub mod user;
