//! Wire format constants and field encoding.
//!
//! Every frame starts with a one-byte message-type tag; the tag alone
//! determines how the remainder is parsed:
//! ```text
//! ┌─────┬──────────────────────────────┐
//! │ Tag │ type-specific payload        │
//! │ 1 B │ see MessageType              │
//! └─────┴──────────────────────────────┘
//! ```
//!
//! Frames carry no length prefix: the connection manager's `write`
//! contract is frame-atomic, so one accepted write is one frame. All
//! multi-byte integers are Big Endian.

use crate::error::{PublishError, Result};

/// Byte length of the message-type tag.
pub const TAG_SIZE: usize = 1;

/// Byte length of the truncated window id carried by window-delimiting
/// frames.
pub const WINDOW_ID_SIZE: usize = 4;

/// Byte length of the partition key preceding payload data.
pub const PARTITION_KEY_SIZE: usize = 4;

/// Total length of a window-delimiting frame (tag + window id).
pub const WINDOW_FRAME_SIZE: usize = TAG_SIZE + WINDOW_ID_SIZE;

/// Total length of a RESET_WINDOW frame (tag + base seconds + interval).
pub const RESET_FRAME_SIZE: usize = TAG_SIZE + 4 + 4;

/// Message-type tag identifying how a frame's remainder is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageType {
    /// Partition key followed by opaque data bytes.
    Payload = 1,
    /// Base seconds and interval millis; no window id.
    ResetWindow = 2,
    /// Truncated window id.
    BeginWindow = 3,
    /// Truncated window id.
    EndWindow = 4,
    /// Truncated window id.
    EndStream = 5,
    /// Opaque serializer state bytes.
    CodecState = 6,
    /// Truncated window id; same layout as BEGIN_WINDOW.
    Checkpoint = 7,
}

impl MessageType {
    /// Parse a tag byte.
    ///
    /// # Errors
    ///
    /// Returns a protocol error for tags outside the enumerated set.
    pub fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            1 => Ok(MessageType::Payload),
            2 => Ok(MessageType::ResetWindow),
            3 => Ok(MessageType::BeginWindow),
            4 => Ok(MessageType::EndWindow),
            5 => Ok(MessageType::EndStream),
            6 => Ok(MessageType::CodecState),
            7 => Ok(MessageType::Checkpoint),
            other => Err(PublishError::Protocol(format!(
                "Unknown message-type tag: {}",
                other
            ))),
        }
    }

    /// Tag byte written on the wire.
    #[inline]
    pub fn tag(self) -> u8 {
        self as u8
    }
}

/// Truncate a 64-bit window id to its wire representation (low 32 bits,
/// Big Endian).
#[inline]
pub fn window_id_bytes(window_id: u64) -> [u8; WINDOW_ID_SIZE] {
    (window_id as u32).to_be_bytes()
}

/// Read a truncated window id field.
///
/// Returns `None` if the slice is too short.
#[inline]
pub fn read_u32_field(buf: &[u8]) -> Option<u32> {
    let bytes: [u8; 4] = buf.get(..4)?.try_into().ok()?;
    Some(u32::from_be_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_values_are_stable() {
        assert_eq!(MessageType::Payload.tag(), 1);
        assert_eq!(MessageType::ResetWindow.tag(), 2);
        assert_eq!(MessageType::BeginWindow.tag(), 3);
        assert_eq!(MessageType::EndWindow.tag(), 4);
        assert_eq!(MessageType::EndStream.tag(), 5);
        assert_eq!(MessageType::CodecState.tag(), 6);
        assert_eq!(MessageType::Checkpoint.tag(), 7);
    }

    #[test]
    fn test_from_tag_roundtrip() {
        for ty in [
            MessageType::Payload,
            MessageType::ResetWindow,
            MessageType::BeginWindow,
            MessageType::EndWindow,
            MessageType::EndStream,
            MessageType::CodecState,
            MessageType::Checkpoint,
        ] {
            assert_eq!(MessageType::from_tag(ty.tag()).unwrap(), ty);
        }
    }

    #[test]
    fn test_from_tag_unknown_rejected() {
        for tag in [0u8, 8, 42, 255] {
            let result = MessageType::from_tag(tag);
            assert!(matches!(result, Err(PublishError::Protocol(_))));
        }
    }

    #[test]
    fn test_window_id_truncates_to_low_32_bits() {
        assert_eq!(window_id_bytes(5), [0, 0, 0, 5]);
        assert_eq!(window_id_bytes(0x1_0000_0000), [0, 0, 0, 0]);
        assert_eq!(window_id_bytes(0xABCD_0000_0102_0304), [0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_read_u32_field() {
        assert_eq!(read_u32_field(&[0, 0, 0, 5]), Some(5));
        assert_eq!(read_u32_field(&[0x01, 0x02, 0x03, 0x04, 0xFF]), Some(0x01020304));
        assert_eq!(read_u32_field(&[0, 0, 0]), None);
    }
}
