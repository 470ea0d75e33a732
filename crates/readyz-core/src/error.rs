//! Shared error type across readyz crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, ReadyzError>;

/// Unified error type used by core and server.
///
/// Request handling never fails; every variant here is a startup or
/// lifecycle condition that ends the process.
#[derive(Debug, Error)]
pub enum ReadyzError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("server failed: {0}")]
    Serve(#[source] std::io::Error),
}

impl ReadyzError {
    /// Stable short name, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            ReadyzError::Bind { .. } => "BIND",
            ReadyzError::Serve(_) => "SERVE",
        }
    }
}
