// SPDX-License-Identifier: MIT
//
// Jitterpool: Blocking Entropy Pool Fed by Network Round-Trip Jitter
//
// https://github.com/yourusername/jitterpool

//! Error types for the jitterpool system
//!
//! Provides a unified error taxonomy using `thiserror` for ergonomic error handling.

pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for jitterpool operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration validation failed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Jitter probe failed to produce a sample
    #[error("Jitter source error: {0}")]
    Source(String),

    /// Caller asked for something the pool cannot satisfy
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if error is expected during normal operation.
    ///
    /// Source errors are part of the contract: a failed probe attempt shrinks
    /// a round's contribution and is never propagated past accumulation.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Source(_) | Error::Io(_))
    }
}
