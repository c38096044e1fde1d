//! Wire types for the Ticket-Desk HTTP API.
//!
//! Everything that crosses the wire between the daemon, the client wrapper
//! and the CLI lives here, so the three agree on one set of shapes.

pub mod ticket;
pub mod user;
