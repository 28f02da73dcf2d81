//! Trialflow error types.

use thiserror::Error;

/// Errors that can occur while requesting or confirming a trial.
#[derive(Debug, Error)]
pub enum TrialError {
    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Submission was rejected as malformed or duplicate (user-correctable).
    #[error("{0}")]
    Validation(String),

    /// HTTP transport error talking to the trial service or local backend.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Unexpected status or payload shape from the trial service.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The trial service reported a hard error with a message.
    #[error("Trial service error: {0}")]
    Remote(String),

    /// Generic non-2xx response without a usable error body.
    #[error("Internal server error from trial service")]
    Internal,

    /// Token confirmed remotely but the local backend failed to store it.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// No trial link recorded; submit or resume a session first.
    #[error("No trial link available")]
    MissingTrialLink,

    /// No resend link recorded; the trial has not reached the waiting state.
    #[error("No resend link available")]
    MissingResendLink,
}
