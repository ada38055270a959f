//! Codec module - payload serialization and partitioning.
//!
//! The publisher consumes a codec through the narrow [`StreamCodec`]
//! contract: serialize one payload (optionally emitting serializer-state
//! bytes that must precede it on the wire), assign a partition key, and
//! reset internal state on checkpoint. Stock implementations:
//!
//! - [`MsgPackCodec`] - MessagePack via `rmp-serde` for `serde` payloads
//! - [`RawCodec`] - pass-through for already-encoded bytes (zero-copy)
//!
//! Both stock codecs are stateless: they never emit state bytes and their
//! `reset_state` is a no-op. A dictionary- or schema-based codec would
//! emit its snapshot from `encode` after each state change.

mod msgpack;
mod raw;

use bytes::Bytes;

use crate::error::Result;

pub use msgpack::MsgPackCodec;
pub use raw::RawCodec;

/// Output of one [`StreamCodec::encode`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    /// Serializer-state bytes, present only when state changed since the
    /// last call (or since `reset_state`). Must reach the consumer before
    /// `data`.
    pub state: Option<Bytes>,
    /// The serialized payload.
    pub data: Bytes,
}

impl EncodedPayload {
    /// Payload with no accompanying state.
    pub fn stateless(data: Bytes) -> Self {
        Self { state: None, data }
    }
}

/// Serializer/partitioner applied to data tuples.
///
/// The codec is supplied externally at activation and shared with the
/// upstream component that computes partition keys; the publisher borrows
/// it for the connection's lifetime and mutates its state only through
/// [`reset_state`](StreamCodec::reset_state).
pub trait StreamCodec<T>: Send + Sync {
    /// Serialize one payload, returning state bytes only when serializer
    /// state has changed since the last call.
    fn encode(&self, payload: &T) -> Result<EncodedPayload>;

    /// Deterministic mapping from payload to partition key; stable for
    /// identical payload and codec state.
    fn partition_of(&self, payload: &T) -> u32;

    /// Clear internal serialization state (invoked on CHECKPOINT), so the
    /// next `encode` re-emits state bytes.
    fn reset_state(&self);
}

/// Partition key from a deterministic hash of encoded bytes.
///
/// `DefaultHasher::new()` uses fixed keys, so identical bytes always map
/// to the same key.
pub(crate) fn partition_key_of(bytes: &[u8]) -> u32 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    hasher.finish() as u32
}
