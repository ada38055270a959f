//! Transport module - the connection-manager contract.
//!
//! The asynchronous connection manager owns sockets and runs its own I/O
//! loop; this crate consumes it through a narrow capability and never
//! implements it. The publisher registers itself via [`EventLoop::connect`]
//! and pushes frames through the non-blocking [`EventLoop::write`].
//!
//! # Threading
//!
//! `write` must be safe to call from the processing node's execution
//! context while the manager's I/O loop runs elsewhere. A `write` either
//! accepts the whole frame or rejects it; there is no partial enqueue.

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;

use crate::error::Result;

/// Non-blocking connection manager consumed by the publisher.
pub trait EventLoop: Send + Sync {
    /// Asynchronously establish a socket to `address` on behalf of
    /// `client`. Returns before the connection completes; failures are
    /// reported through the manager's own error path.
    ///
    /// Registration-time facts (identity, queue sizing, the window id to
    /// resume from after reconnect) are read off the client here.
    fn connect(&self, address: SocketAddr, client: Arc<dyn EventLoopClient>);

    /// Tear down the client's socket.
    fn disconnect(&self, client: &dyn EventLoopClient);

    /// Attempt a non-blocking enqueue of one frame for transmission.
    /// Returns whether the frame was accepted; a rejected frame was not
    /// partially written and may be offered again.
    fn write(&self, client: &dyn EventLoopClient, frame: Bytes) -> bool;
}

/// A client registered with an [`EventLoop`].
pub trait EventLoopClient: Send + Sync {
    /// Identity used for registration and logging only.
    fn client_id(&self) -> &str;

    /// Send-queue capacity hint for the connection.
    fn queue_capacity(&self) -> usize;

    /// Last fully-finished window id, letting the manager resume the
    /// stream after a reconnect.
    fn resume_window_id(&self) -> u64;

    /// Inbound bytes delivered by the manager.
    fn on_message(&self, data: &[u8]) -> Result<()>;
}
