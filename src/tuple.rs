//! Logical tuples flowing from a processing node into the publisher.
//!
//! Two families exist at runtime: control tuples that delimit the stream
//! (window boundaries, checkpoints, termination, time resets) and data
//! tuples carrying an opaque application payload. Data tuples are scoped
//! to the window currently open on the publishing side.

/// One logical tuple offered to [`PublisherClient::put`](crate::PublisherClient::put).
#[derive(Debug, Clone, PartialEq)]
pub enum Tuple<T> {
    /// Stream control marker.
    Control(ControlTuple),
    /// Application payload, serialized by the stream codec.
    Payload(T),
}

/// Control markers delimiting the published stream.
///
/// Window ids are monotonically non-decreasing 64-bit values; all but
/// `ResetWindow` carry one (truncated to 32 bits on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlTuple {
    /// Serializer state is stale; it must be retransmitted before further
    /// payload.
    Checkpoint { window_id: u64 },
    /// Opens window `window_id`; must precede any data tuple attributed
    /// to it.
    BeginWindow { window_id: u64 },
    /// Closes window `window_id`.
    EndWindow { window_id: u64 },
    /// Terminates the stream after window `window_id`.
    EndStream { window_id: u64 },
    /// Re-bases windowing time; carries no window id.
    ResetWindow { base_seconds: u32, interval_millis: u32 },
}

impl ControlTuple {
    /// Window id carried by this marker, if any.
    pub fn window_id(&self) -> Option<u64> {
        match self {
            ControlTuple::Checkpoint { window_id }
            | ControlTuple::BeginWindow { window_id }
            | ControlTuple::EndWindow { window_id }
            | ControlTuple::EndStream { window_id } => Some(*window_id),
            ControlTuple::ResetWindow { .. } => None,
        }
    }
}
