//! Publisher client: the producer-facing half of the buffer-server
//! transport.
//!
//! The client takes the tuple stream produced by one processing node and
//! pushes it, framed, to the remote buffer server through a non-blocking
//! connection manager. It classifies each tuple (control vs. data),
//! selects the matching frame encoder or runs the codec, and retries
//! rejected writes until the transport accepts the frame.
//!
//! # Lifecycle
//!
//! `CREATED → ACTIVE (activate) → INACTIVE (deactivate)`. `put` is valid
//! only while ACTIVE. Re-activation is illegal; build a fresh client
//! after teardown instead.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tuplewire_client::codec::MsgPackCodec;
//! use tuplewire_client::{ControlTuple, PublisherClient, StreamContext, Tuple};
//!
//! let publisher = Arc::new(PublisherClient::new("operator-3.out", 1024));
//! publisher.activate(
//!     StreamContext::new(("buffer.example.org", 9090), event_loop, Arc::new(MsgPackCodec))
//!         .finished_window_id(41),
//! )?;
//!
//! publisher.put(Tuple::Control(ControlTuple::BeginWindow { window_id: 42 })).await?;
//! publisher.put(Tuple::Payload(record)).await?;
//! publisher.put(Tuple::Control(ControlTuple::EndWindow { window_id: 42 })).await?;
//! publisher.deactivate()?;
//! ```

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use bytes::Bytes;

use crate::codec::StreamCodec;
use crate::context::StreamContext;
use crate::counters::StreamCounters;
use crate::error::{PublishError, Result};
use crate::protocol::{encode_codec_state, encode_control, encode_payload};
use crate::transport::{EventLoop, EventLoopClient};
use crate::tuple::{ControlTuple, Tuple};

/// Delay between write attempts while the transport rejects a frame.
const WRITE_RETRY_INTERVAL: Duration = Duration::from_millis(5);

const CREATED: u8 = 0;
const ACTIVE: u8 = 1;
const INACTIVE: u8 = 2;

/// Single-destination publisher for one logical stream.
///
/// Fan-out to consumers is the buffer server's job; this client is
/// send-only and never multiplexes to local sinks.
pub struct PublisherClient<T> {
    source_id: String,
    queue_capacity: usize,
    state: AtomicU8,
    counters: StreamCounters,
    resume_window_id: AtomicU64,
    codec: OnceLock<Arc<dyn StreamCodec<T>>>,
    event_loop: OnceLock<Arc<dyn EventLoop>>,
}

impl<T> PublisherClient<T> {
    /// Create an idle publisher with its identity and the send-queue
    /// capacity hint handed to the connection layer.
    pub fn new(source_id: impl Into<String>, queue_capacity: usize) -> Self {
        Self {
            source_id: source_id.into(),
            queue_capacity,
            state: AtomicU8::new(CREATED),
            counters: StreamCounters::new(),
            resume_window_id: AtomicU64::new(0),
            codec: OnceLock::new(),
            event_loop: OnceLock::new(),
        }
    }

    /// Offer one logical tuple for transmission.
    ///
    /// The offered-tuple counter increments before anything else, so it
    /// counts every call regardless of outcome. Control tuples go through
    /// the frame encoders; data tuples run through the codec, with a
    /// CODEC_STATE frame transmitted ahead of the PAYLOAD frame whenever
    /// the codec reports changed state. CHECKPOINT resets the codec
    /// before encoding, so the next data tuple re-sends state.
    ///
    /// Rejected writes are retried indefinitely with a fixed short delay;
    /// `put` returns only once every frame it produced was accepted.
    ///
    /// # Errors
    ///
    /// [`PublishError::NotActive`] outside the ACTIVE state,
    /// [`PublishError::Interrupted`] when deactivation lands mid-retry,
    /// or a codec encoding failure.
    pub async fn put(&self, tuple: Tuple<T>) -> Result<()> {
        self.counters.record_offered();

        if self.state.load(Ordering::Acquire) != ACTIVE {
            return Err(PublishError::NotActive);
        }
        let codec = self.codec.get().ok_or(PublishError::NotActive)?;

        let frame = match tuple {
            Tuple::Control(control) => {
                if let ControlTuple::Checkpoint { .. } = control {
                    codec.reset_state();
                }
                encode_control(&control)
            }
            Tuple::Payload(payload) => {
                let encoded = codec.encode(&payload)?;

                // State, if any, must reach the consumer before the data
                // encoded against it.
                if let Some(state) = encoded.state {
                    self.transmit(encode_codec_state(&state)).await?;
                }

                encode_payload(codec.partition_of(&payload), &encoded.data)
            }
        };

        self.transmit(frame).await
    }

    /// Retry the non-blocking write until the transport accepts the
    /// frame, then account its bytes. Exactly one acceptance is counted
    /// no matter how many attempts it took.
    async fn transmit(&self, frame: Bytes) -> Result<()> {
        let event_loop = self.event_loop.get().ok_or(PublishError::NotActive)?;
        let len = frame.len() as u64;

        while !event_loop.write(self.as_client(), frame.clone()) {
            if self.state.load(Ordering::Acquire) != ACTIVE {
                return Err(PublishError::Interrupted);
            }
            tokio::time::sleep(WRITE_RETRY_INTERVAL).await;
        }

        self.counters.record_published(len);
        Ok(())
    }

    #[inline]
    fn as_client(&self) -> &dyn EventLoopClient {
        self
    }

    /// Always `false`: fan-out happens at the buffer server, not here.
    pub fn is_multi_sink_capable(&self) -> bool {
        false
    }

    /// Downstream sink registration is never available on a publisher.
    pub fn set_sink(&self, _id: &str) -> Result<()> {
        Err(PublishError::SinkNotSupported)
    }

    /// No resources to acquire before activation.
    pub fn setup(&self) {}

    /// Nothing held outside activate/deactivate.
    pub fn teardown(&self) {}

    /// Cumulative bytes accepted by the transport; atomically
    /// read-and-zeroed when `reset`.
    pub fn byte_count(&self, reset: bool) -> u64 {
        self.counters.byte_count(reset)
    }

    /// Cumulative tuples offered to `put`; atomically read-and-zeroed
    /// when `reset`.
    pub fn tuple_count(&self, reset: bool) -> u64 {
        self.counters.tuple_count(reset)
    }
}

impl<T: 'static> PublisherClient<T> {
    /// Go live: resolve the server address, register with the connection
    /// manager, and borrow the codec for the connection's lifetime.
    ///
    /// The connection attempt is asynchronous; this returns as soon as
    /// registration is handed to the manager.
    ///
    /// # Errors
    ///
    /// Address-resolution failures, or [`PublishError::AlreadyActive`]
    /// on any second activation.
    pub fn activate(self: &Arc<Self>, context: StreamContext<T>) -> Result<()> {
        let address = context.address.resolve()?;

        self.state
            .compare_exchange(CREATED, ACTIVE, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| PublishError::AlreadyActive)?;

        self.resume_window_id
            .store(context.finished_window_id, Ordering::Release);
        if self.codec.set(context.codec).is_err()
            || self.event_loop.set(Arc::clone(&context.event_loop)).is_err()
        {
            return Err(PublishError::AlreadyActive);
        }

        tracing::debug!(
            source = %context.source_id,
            stream = %context.stream_id,
            window_id = context.finished_window_id,
            server = %address,
            "registering publisher"
        );

        context
            .event_loop
            .connect(address, Arc::clone(self) as Arc<dyn EventLoopClient>);
        Ok(())
    }

    /// Request disconnection from the connection manager. Any `put`
    /// waiting out backpressure fails with
    /// [`PublishError::Interrupted`].
    ///
    /// # Errors
    ///
    /// [`PublishError::NotActivated`] before a successful `activate`,
    /// [`PublishError::NotActive`] on repeated deactivation.
    pub fn deactivate(&self) -> Result<()> {
        self.state
            .compare_exchange(ACTIVE, INACTIVE, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|state| {
                if state == CREATED {
                    PublishError::NotActivated
                } else {
                    PublishError::NotActive
                }
            })?;

        tracing::debug!(source = %self.source_id, "deactivating publisher");

        let event_loop = self.event_loop.get().ok_or(PublishError::NotActivated)?;
        event_loop.disconnect(self.as_client());
        Ok(())
    }
}

impl<T> EventLoopClient for PublisherClient<T> {
    fn client_id(&self) -> &str {
        &self.source_id
    }

    fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    fn resume_window_id(&self) -> u64 {
        self.resume_window_id.load(Ordering::Acquire)
    }

    fn on_message(&self, data: &[u8]) -> Result<()> {
        tracing::error!(
            source = %self.source_id,
            len = data.len(),
            "send-only publisher received inbound bytes"
        );
        Err(PublishError::UnexpectedInbound(data.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::sync::Mutex;

    use crate::codec::RawCodec;

    /// Event loop that accepts every frame into a log.
    #[derive(Default)]
    struct NullEventLoop {
        frames: Mutex<Vec<Bytes>>,
        connected: Mutex<Vec<String>>,
        disconnected: Mutex<Vec<String>>,
    }

    impl EventLoop for NullEventLoop {
        fn connect(&self, _address: SocketAddr, client: Arc<dyn EventLoopClient>) {
            self.connected
                .lock()
                .unwrap()
                .push(client.client_id().to_string());
        }

        fn disconnect(&self, client: &dyn EventLoopClient) {
            self.disconnected
                .lock()
                .unwrap()
                .push(client.client_id().to_string());
        }

        fn write(&self, _client: &dyn EventLoopClient, frame: Bytes) -> bool {
            self.frames.lock().unwrap().push(frame);
            true
        }
    }

    fn context(event_loop: &Arc<NullEventLoop>) -> StreamContext<Bytes> {
        let addr: SocketAddr = "127.0.0.1:9090".parse().unwrap();
        StreamContext::new(
            addr,
            Arc::clone(event_loop) as Arc<dyn EventLoop>,
            Arc::new(RawCodec),
        )
        .source_id("node-1.out")
        .stream_id("s1")
    }

    #[tokio::test]
    async fn test_put_before_activate_fails_but_counts() {
        let publisher: PublisherClient<Bytes> = PublisherClient::new("node-1.out", 16);

        let result = publisher
            .put(Tuple::Control(ControlTuple::BeginWindow { window_id: 1 }))
            .await;

        assert!(matches!(result, Err(PublishError::NotActive)));
        assert_eq!(publisher.tuple_count(false), 1);
        assert_eq!(publisher.byte_count(false), 0);
    }

    #[tokio::test]
    async fn test_put_after_deactivate_fails_but_counts() {
        let event_loop = Arc::new(NullEventLoop::default());
        let publisher = Arc::new(PublisherClient::<Bytes>::new("node-1.out", 16));
        publisher.activate(context(&event_loop)).unwrap();
        publisher.deactivate().unwrap();

        let result = publisher
            .put(Tuple::Control(ControlTuple::EndWindow { window_id: 1 }))
            .await;

        assert!(matches!(result, Err(PublishError::NotActive)));
        assert_eq!(publisher.tuple_count(false), 1);
    }

    #[test]
    fn test_activate_twice_rejected() {
        let event_loop = Arc::new(NullEventLoop::default());
        let publisher = Arc::new(PublisherClient::<Bytes>::new("node-1.out", 16));

        publisher.activate(context(&event_loop)).unwrap();
        let second = publisher.activate(context(&event_loop));

        assert!(matches!(second, Err(PublishError::AlreadyActive)));
    }

    #[test]
    fn test_reactivation_after_deactivate_rejected() {
        let event_loop = Arc::new(NullEventLoop::default());
        let publisher = Arc::new(PublisherClient::<Bytes>::new("node-1.out", 16));

        publisher.activate(context(&event_loop)).unwrap();
        publisher.deactivate().unwrap();

        assert!(matches!(
            publisher.activate(context(&event_loop)),
            Err(PublishError::AlreadyActive)
        ));
    }

    #[test]
    fn test_deactivate_before_activate_rejected() {
        let publisher = Arc::new(PublisherClient::<Bytes>::new("node-1.out", 16));
        assert!(matches!(
            publisher.deactivate(),
            Err(PublishError::NotActivated)
        ));
    }

    #[test]
    fn test_deactivate_twice_rejected() {
        let event_loop = Arc::new(NullEventLoop::default());
        let publisher = Arc::new(PublisherClient::<Bytes>::new("node-1.out", 16));

        publisher.activate(context(&event_loop)).unwrap();
        publisher.deactivate().unwrap();

        assert!(matches!(
            publisher.deactivate(),
            Err(PublishError::NotActive)
        ));
    }

    #[test]
    fn test_connect_and_disconnect_reach_the_manager() {
        let event_loop = Arc::new(NullEventLoop::default());
        let publisher = Arc::new(PublisherClient::<Bytes>::new("node-1.out", 16));

        publisher.activate(context(&event_loop)).unwrap();
        assert_eq!(&*event_loop.connected.lock().unwrap(), &["node-1.out"]);

        publisher.deactivate().unwrap();
        assert_eq!(&*event_loop.disconnected.lock().unwrap(), &["node-1.out"]);
    }

    #[test]
    fn test_never_multi_sink_capable() {
        let publisher: PublisherClient<Bytes> = PublisherClient::new("node-1.out", 16);
        assert!(!publisher.is_multi_sink_capable());
    }

    #[test]
    fn test_set_sink_always_fails() {
        let publisher: PublisherClient<Bytes> = PublisherClient::new("node-1.out", 16);
        assert!(matches!(
            publisher.set_sink("downstream"),
            Err(PublishError::SinkNotSupported)
        ));
    }

    #[test]
    fn test_on_message_always_fails() {
        let publisher: PublisherClient<Bytes> = PublisherClient::new("node-1.out", 16);
        let result = publisher.on_message(b"anything");
        assert!(matches!(result, Err(PublishError::UnexpectedInbound(8))));
    }

    #[test]
    fn test_queue_capacity_and_resume_window_visible_to_manager() {
        let event_loop = Arc::new(NullEventLoop::default());
        let publisher = Arc::new(PublisherClient::<Bytes>::new("node-1.out", 128));
        publisher
            .activate(context(&event_loop).finished_window_id(41))
            .unwrap();

        let client = publisher.as_client();
        assert_eq!(client.queue_capacity(), 128);
        assert_eq!(client.resume_window_id(), 41);
    }

    #[test]
    fn test_setup_and_teardown_are_noops() {
        let publisher: PublisherClient<Bytes> = PublisherClient::new("node-1.out", 16);
        publisher.setup();
        publisher.teardown();
        assert_eq!(publisher.tuple_count(false), 0);
    }
}
