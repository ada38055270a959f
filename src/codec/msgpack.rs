//! MsgPack codec using `rmp-serde`.
//!
//! Uses `to_vec_named` so structs serialize as maps (with field names)
//! rather than positional arrays; consumers written against other
//! MessagePack implementations expect the map format.
//!
//! # Example
//!
//! ```
//! use tuplewire_client::codec::{MsgPackCodec, StreamCodec};
//!
//! let codec = MsgPackCodec;
//! let encoded = codec.encode(&"hello").unwrap();
//! let decoded: String = rmp_serde::from_slice(&encoded.data).unwrap();
//! assert_eq!(decoded, "hello");
//! assert!(encoded.state.is_none());
//! ```

use bytes::Bytes;
use serde::Serialize;

use super::{partition_key_of, EncodedPayload, StreamCodec};
use crate::error::Result;

/// MessagePack codec for structured payloads.
///
/// Stateless: never emits state bytes, `reset_state` is a no-op. The
/// partition key is a deterministic hash of the encoded representation.
pub struct MsgPackCodec;

impl<T: Serialize> StreamCodec<T> for MsgPackCodec {
    fn encode(&self, payload: &T) -> Result<EncodedPayload> {
        let data = rmp_serde::to_vec_named(payload)?;
        Ok(EncodedPayload::stateless(Bytes::from(data)))
    }

    fn partition_of(&self, payload: &T) -> u32 {
        rmp_serde::to_vec_named(payload)
            .map(|bytes| partition_key_of(&bytes))
            .unwrap_or(0)
    }

    fn reset_state(&self) {}
}
