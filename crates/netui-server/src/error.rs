//! Server error types.

use std::io;

use thiserror::Error;

/// Errors that can occur in the server.
///
/// Only startup can fail: once the listener is bound, per-connection faults
/// end that connection's task and are logged, never returned.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration error (zero-sized terminal, empty bind address, etc.).
    ///
    /// Fatal - fix configuration and restart.
    #[error("configuration error: {0}")]
    Config(String),

    /// Binding the listener failed (address in use, permission denied, etc.).
    ///
    /// Fatal - the server cannot accept connections.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address that could not be bound
        addr: String,
        /// Underlying I/O error
        source: io::Error,
    },

    /// Other I/O error on the listener itself.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
