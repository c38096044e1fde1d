//! Common types and utilities.

/// Client wrapper error type.
pub use crate::error::Error;

/// Client wrapper result type.
pub type Result<T> = core::result::Result<T, Error>;
