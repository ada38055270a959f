//! Raw codec - pass-through for binary payloads.
//!
//! Used when payloads are already serialized upstream. The data bytes are
//! passed through zero-copy.

use bytes::Bytes;

use super::{partition_key_of, EncodedPayload, StreamCodec};
use crate::error::Result;

/// Codec that passes `Bytes` payloads through without transformation.
///
/// Stateless: never emits state bytes, `reset_state` is a no-op. The
/// partition key is a deterministic hash of the bytes.
pub struct RawCodec;

impl StreamCodec<Bytes> for RawCodec {
    fn encode(&self, payload: &Bytes) -> Result<EncodedPayload> {
        Ok(EncodedPayload::stateless(payload.clone()))
    }

    fn partition_of(&self, payload: &Bytes) -> u32 {
        partition_key_of(payload)
    }

    fn reset_state(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_through_zero_copy() {
        let payload = Bytes::from_static(b"already encoded");
        let encoded = RawCodec.encode(&payload).unwrap();

        assert!(encoded.state.is_none());
        assert_eq!(encoded.data.as_ptr(), payload.as_ptr());
    }

    #[test]
    fn test_empty_payload() {
        let encoded = RawCodec.encode(&Bytes::new()).unwrap();
        assert!(encoded.data.is_empty());
    }

    #[test]
    fn test_all_byte_values_preserved() {
        let all: Vec<u8> = (0..=255).collect();
        let payload = Bytes::from(all.clone());
        let encoded = RawCodec.encode(&payload).unwrap();
        assert_eq!(&encoded.data[..], &all[..]);
    }

    #[test]
    fn test_partition_stable() {
        let payload = Bytes::from_static(b"route me");
        assert_eq!(
            RawCodec.partition_of(&payload),
            RawCodec.partition_of(&payload.clone())
        );
    }
}
