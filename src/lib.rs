//! # tuplewire-client
//!
//! Publisher-side client SDK for the Tuplewire buffer-server transport.
//!
//! This crate is the producer half of a stream-processing engine's
//! inter-node transport: it takes the tuple stream emitted by one
//! processing node and pushes it, as a framed binary protocol, to a
//! remote buffer server that persists and fans tuples out to downstream
//! consumers.
//!
//! ## Architecture
//!
//! - **Protocol** ([`protocol`]): one-byte-tagged wire frames for window
//!   boundaries, checkpoints, stream termination, time resets, codec
//!   state, and payloads.
//! - **Codec** ([`codec`]): pluggable serializer/partitioner applied to
//!   data tuples; serializer state is itself transmitted and reset.
//! - **Transport** ([`transport`]): contract for the external
//!   non-blocking connection manager that owns sockets.
//! - **Publisher** ([`PublisherClient`]): classifies tuples, frames them,
//!   and retries rejected writes under backpressure while keeping wire
//!   order intact.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tuplewire_client::codec::MsgPackCodec;
//! use tuplewire_client::{ControlTuple, PublisherClient, StreamContext, Tuple};
//!
//! let publisher = Arc::new(PublisherClient::new("operator-3.out", 1024));
//! publisher.activate(
//!     StreamContext::new(("buffer.example.org", 9090), event_loop, Arc::new(MsgPackCodec)),
//! )?;
//!
//! publisher.put(Tuple::Control(ControlTuple::BeginWindow { window_id: 1 })).await?;
//! publisher.put(Tuple::Payload(record)).await?;
//! publisher.put(Tuple::Control(ControlTuple::EndWindow { window_id: 1 })).await?;
//! ```

pub mod codec;
pub mod error;
pub mod protocol;
pub mod transport;

mod context;
mod counters;
mod publisher;
mod tuple;

pub use context::{ServerAddress, StreamContext};
pub use error::PublishError;
pub use publisher::PublisherClient;
pub use tuple::{ControlTuple, Tuple};
