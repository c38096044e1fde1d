//! Database models and ORM layer for Ticket-Desk.
//!
//! Provides Diesel-based models, queries and connection management for the
//! two persisted entities: user accounts and support tickets.
//!
//! # Usage
//!
//! ```rust,no_run
//! use tk_models::{user::TkUser, db::{config::DbConfig, connection::DbConnection}};
//!
//! let config = DbConfig::from_env();
//! let conn = DbConnection::new(&config);
//!
//! let users = TkUser::fetch_all(&conn).unwrap();
//! println!("Found {} users", users.len());
//! ```

pub mod db;
pub mod error;
pub mod prelude;
pub mod ticket;
pub mod user;
mod schema;
