//! Protocol module - wire format and frame encoding.
//!
//! This module implements the producer-facing binary protocol:
//! - one-byte message-type tags and Big Endian field layout
//! - pure frame encoders for every tuple kind
//! - the reference decoder used by consumers (and tests) to parse frames

mod frame;
mod wire_format;

pub use frame::{
    encode_begin_window, encode_checkpoint, encode_codec_state, encode_control,
    encode_end_stream, encode_end_window, encode_payload, encode_reset_window, WireFrame,
};
pub use wire_format::{
    window_id_bytes, MessageType, PARTITION_KEY_SIZE, RESET_FRAME_SIZE, TAG_SIZE,
    WINDOW_FRAME_SIZE, WINDOW_ID_SIZE,
};
