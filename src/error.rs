//! Error types for tuplewire-client.

use thiserror::Error;

/// Main error type for all publisher operations.
#[derive(Debug, Error)]
pub enum PublishError {
    /// I/O error during address resolution.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// MsgPack serialization error (stock codec).
    #[error("MsgPack encode error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    /// Protocol error (unknown frame tag, truncated frame, etc.).
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Remote address did not resolve to any socket address.
    #[error("Address did not resolve: {0}")]
    Unresolved(String),

    /// Operation requires an active publisher.
    #[error("Publisher is not active")]
    NotActive,

    /// `activate` called more than once.
    #[error("Publisher was already activated")]
    AlreadyActive,

    /// `deactivate` called before a successful `activate`.
    #[error("Publisher was never activated")]
    NotActivated,

    /// Backpressure wait interrupted by deactivation.
    #[error("Backpressure wait interrupted")]
    Interrupted,

    /// Inbound bytes delivered to a send-only client.
    #[error("Publisher is send-only but received {0} inbound bytes")]
    UnexpectedInbound(usize),

    /// Downstream sink registration attempted on a publisher.
    #[error("Publisher does not accept downstream sinks")]
    SinkNotSupported,
}

/// Result type alias using PublishError.
pub type Result<T> = std::result::Result<T, PublishError>;
