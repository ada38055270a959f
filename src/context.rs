//! Stream context consumed by the publisher at activation.
//!
//! The context carries everything the publisher borrows for a
//! connection's lifetime: the remote buffer-server address (possibly
//! still unresolved), the shared connection manager, the codec, the last
//! fully-finished window id, and identifiers used for registration and
//! logging. Construction follows a fluent-setter idiom:
//!
//! ```no_run
//! use std::sync::Arc;
//! use tuplewire_client::codec::MsgPackCodec;
//! use tuplewire_client::StreamContext;
//! # fn event_loop() -> Arc<dyn tuplewire_client::transport::EventLoop> { unimplemented!() }
//!
//! let context: StreamContext<String> =
//!     StreamContext::new(("buffer.example.org", 9090), event_loop(), Arc::new(MsgPackCodec))
//!         .finished_window_id(41)
//!         .source_id("operator-3.out")
//!         .stream_id("wordcount.split");
//! ```

use std::fmt;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;

use crate::codec::StreamCodec;
use crate::error::{PublishError, Result};
use crate::transport::EventLoop;

/// Remote buffer-server address, resolved or still host+port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerAddress {
    /// Already a socket address.
    Resolved(SocketAddr),
    /// Host and port awaiting DNS resolution at activation.
    Unresolved { host: String, port: u16 },
}

impl ServerAddress {
    /// Resolve to a socket address, performing a DNS lookup for
    /// unresolved hosts.
    ///
    /// # Errors
    ///
    /// I/O errors from the resolver, or [`PublishError::Unresolved`] when
    /// the lookup yields no address.
    pub fn resolve(&self) -> Result<SocketAddr> {
        match self {
            ServerAddress::Resolved(addr) => Ok(*addr),
            ServerAddress::Unresolved { host, port } => (host.as_str(), *port)
                .to_socket_addrs()?
                .next()
                .ok_or_else(|| PublishError::Unresolved(format!("{}:{}", host, port))),
        }
    }
}

impl From<SocketAddr> for ServerAddress {
    fn from(addr: SocketAddr) -> Self {
        ServerAddress::Resolved(addr)
    }
}

impl From<(&str, u16)> for ServerAddress {
    fn from((host, port): (&str, u16)) -> Self {
        ServerAddress::Unresolved {
            host: host.to_string(),
            port,
        }
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerAddress::Resolved(addr) => addr.fmt(f),
            ServerAddress::Unresolved { host, port } => write!(f, "{}:{}", host, port),
        }
    }
}

/// Activation context for a [`PublisherClient`](crate::PublisherClient).
pub struct StreamContext<T> {
    pub(crate) address: ServerAddress,
    pub(crate) event_loop: Arc<dyn EventLoop>,
    pub(crate) codec: Arc<dyn StreamCodec<T>>,
    pub(crate) finished_window_id: u64,
    pub(crate) source_id: String,
    pub(crate) stream_id: String,
}

impl<T> StreamContext<T> {
    /// Create a context from the three essentials: where to connect, the
    /// connection manager, and the codec.
    pub fn new(
        address: impl Into<ServerAddress>,
        event_loop: Arc<dyn EventLoop>,
        codec: Arc<dyn StreamCodec<T>>,
    ) -> Self {
        Self {
            address: address.into(),
            event_loop,
            codec,
            finished_window_id: 0,
            source_id: String::new(),
            stream_id: String::new(),
        }
    }

    /// Last fully-finished window id, used by the transport to resume the
    /// stream after reconnect. Default: 0.
    pub fn finished_window_id(mut self, window_id: u64) -> Self {
        self.finished_window_id = window_id;
        self
    }

    /// Source identifier, used for registration and logging only.
    pub fn source_id(mut self, id: impl Into<String>) -> Self {
        self.source_id = id.into();
        self
    }

    /// Stream instance identifier, used for logging only.
    pub fn stream_id(mut self, id: impl Into<String>) -> Self {
        self.stream_id = id.into();
        self
    }
}
