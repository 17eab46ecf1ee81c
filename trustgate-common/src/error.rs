//! Failures raised by the document store and the config loader
//!
//! Request-level errors (unknown document, bad input) belong to the HTTP
//! layer; this enum only covers storage and startup.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Creating the database folder failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file unreadable, malformed or out of range
    #[error("Configuration error: {0}")]
    Config(String),

    /// Match list of a verification run could not be encoded or decoded
    #[error("Match list JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored run carries a column that does not parse
    #[error("Malformed {column} in verification run {run_id}: {reason}")]
    MalformedRun {
        run_id: String,
        column: &'static str,
        reason: String,
    },
}
