//! Frame encoders for each tuple kind, plus the reference decoder.
//!
//! Encoding is a pure, stateless transformation from a control-tuple
//! description (or codec output) to bytes. Frames are built once into
//! `bytes::Bytes` so retried write attempts share the same buffer.
//!
//! # Example
//!
//! ```
//! use tuplewire_client::protocol::{encode_begin_window, WireFrame};
//!
//! let frame = encode_begin_window(5);
//! assert_eq!(&frame[..], &[3, 0, 0, 0, 5]);
//!
//! match WireFrame::decode(&frame).unwrap() {
//!     WireFrame::BeginWindow { window_id } => assert_eq!(window_id, 5),
//!     other => panic!("unexpected frame: {:?}", other),
//! }
//! ```

use bytes::{BufMut, Bytes, BytesMut};

use super::wire_format::{
    read_u32_field, window_id_bytes, MessageType, PARTITION_KEY_SIZE, RESET_FRAME_SIZE, TAG_SIZE,
    WINDOW_FRAME_SIZE,
};
use crate::error::{PublishError, Result};
use crate::tuple::ControlTuple;

/// Build a window-delimiting frame: `[tag][low 32 bits of window id]`.
fn window_frame(ty: MessageType, window_id: u64) -> Bytes {
    let mut buf = BytesMut::with_capacity(WINDOW_FRAME_SIZE);
    buf.put_u8(ty.tag());
    buf.put_slice(&window_id_bytes(window_id));
    buf.freeze()
}

/// Encode a BEGIN_WINDOW frame.
pub fn encode_begin_window(window_id: u64) -> Bytes {
    window_frame(MessageType::BeginWindow, window_id)
}

/// Encode an END_WINDOW frame.
pub fn encode_end_window(window_id: u64) -> Bytes {
    window_frame(MessageType::EndWindow, window_id)
}

/// Encode an END_STREAM frame.
pub fn encode_end_stream(window_id: u64) -> Bytes {
    window_frame(MessageType::EndStream, window_id)
}

/// Encode a CHECKPOINT frame.
///
/// Checkpoint framing reuses the window-id layout of BEGIN_WINDOW and is
/// tagged differently, avoiding a separate encoder: the frame is built as
/// BEGIN_WINDOW and its leading tag byte overwritten.
pub fn encode_checkpoint(window_id: u64) -> Bytes {
    let mut buf = BytesMut::from(&encode_begin_window(window_id)[..]);
    buf[0] = MessageType::Checkpoint.tag();
    buf.freeze()
}

/// Encode a RESET_WINDOW frame: `[tag][base seconds][interval millis]`.
pub fn encode_reset_window(base_seconds: u32, interval_millis: u32) -> Bytes {
    let mut buf = BytesMut::with_capacity(RESET_FRAME_SIZE);
    buf.put_u8(MessageType::ResetWindow.tag());
    buf.put_u32(base_seconds);
    buf.put_u32(interval_millis);
    buf.freeze()
}

/// Encode a CODEC_STATE frame: `[tag][opaque state bytes]`.
pub fn encode_codec_state(state: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(TAG_SIZE + state.len());
    buf.put_u8(MessageType::CodecState.tag());
    buf.put_slice(state);
    buf.freeze()
}

/// Encode a PAYLOAD frame: `[tag][partition key][opaque data bytes]`.
pub fn encode_payload(partition_key: u32, data: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(TAG_SIZE + PARTITION_KEY_SIZE + data.len());
    buf.put_u8(MessageType::Payload.tag());
    buf.put_u32(partition_key);
    buf.put_slice(data);
    buf.freeze()
}

/// Encode any control tuple by kind.
pub fn encode_control(tuple: &ControlTuple) -> Bytes {
    match *tuple {
        ControlTuple::Checkpoint { window_id } => encode_checkpoint(window_id),
        ControlTuple::BeginWindow { window_id } => encode_begin_window(window_id),
        ControlTuple::EndWindow { window_id } => encode_end_window(window_id),
        ControlTuple::EndStream { window_id } => encode_end_stream(window_id),
        ControlTuple::ResetWindow {
            base_seconds,
            interval_millis,
        } => encode_reset_window(base_seconds, interval_millis),
    }
}

/// A decoded wire frame.
///
/// The decoder is the consumer-facing inverse of the encoders: it takes
/// one complete frame (frames are delimited by the transport, not by a
/// length prefix) and recovers the message kind and its fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireFrame {
    BeginWindow { window_id: u32 },
    EndWindow { window_id: u32 },
    EndStream { window_id: u32 },
    Checkpoint { window_id: u32 },
    ResetWindow { base_seconds: u32, interval_millis: u32 },
    CodecState { state: Bytes },
    Payload { partition_key: u32, data: Bytes },
}

impl WireFrame {
    /// Decode one complete frame.
    ///
    /// # Errors
    ///
    /// Returns a protocol error for an empty buffer, an unknown tag, or a
    /// frame shorter than its layout requires.
    pub fn decode(frame: &[u8]) -> Result<Self> {
        let (&tag, rest) = frame
            .split_first()
            .ok_or_else(|| PublishError::Protocol("Empty frame".to_string()))?;

        let ty = MessageType::from_tag(tag)?;
        match ty {
            MessageType::BeginWindow
            | MessageType::EndWindow
            | MessageType::EndStream
            | MessageType::Checkpoint => {
                let window_id = read_u32_field(rest).ok_or_else(|| truncated(ty))?;
                Ok(match ty {
                    MessageType::BeginWindow => WireFrame::BeginWindow { window_id },
                    MessageType::EndWindow => WireFrame::EndWindow { window_id },
                    MessageType::EndStream => WireFrame::EndStream { window_id },
                    _ => WireFrame::Checkpoint { window_id },
                })
            }
            MessageType::ResetWindow => {
                let base_seconds = read_u32_field(rest).ok_or_else(|| truncated(ty))?;
                let interval_millis =
                    read_u32_field(&rest[4..]).ok_or_else(|| truncated(ty))?;
                Ok(WireFrame::ResetWindow {
                    base_seconds,
                    interval_millis,
                })
            }
            MessageType::CodecState => Ok(WireFrame::CodecState {
                state: Bytes::copy_from_slice(rest),
            }),
            MessageType::Payload => {
                let partition_key = read_u32_field(rest).ok_or_else(|| truncated(ty))?;
                Ok(WireFrame::Payload {
                    partition_key,
                    data: Bytes::copy_from_slice(&rest[PARTITION_KEY_SIZE..]),
                })
            }
        }
    }
}

fn truncated(ty: MessageType) -> PublishError {
    PublishError::Protocol(format!("Truncated {:?} frame", ty))
}
