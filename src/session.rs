//! The session collaborator contract.
//!
//! The coordinator does not open sockets or encode packets itself. When the
//! application calls [`Client::connect`](crate::client::Client::connect) a fresh
//! [`Session`] is obtained from the [`SessionFactory`], and the coordinator drives it
//! exclusively for the duration of that connection attempt. Protocol events flow back
//! through the [`EventSink`] the factory received: a non-owning handle into the
//! coordinator, so a session that outlives its client delivers into the void instead of
//! dangling.

use std::sync::Weak;

use mqttbytes::v4::{Connect, ConnectReturnCode, Packet, Publish, SubscribeReasonCode};

use crate::client::Shared;

/// Transport-level failures, carried by [`SessionEvent::Disconnected`].
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("MQTT connect rejected: {0:?}")]
    ConnectionRejected(ConnectReturnCode),
    #[error("connection closed")]
    ConnectionClosed,
}

/// Protocol events a session reports back to the coordinator.
#[derive(Debug)]
pub enum SessionEvent {
    /// The broker accepted the connection. `address` is the resolved remote endpoint.
    Connected { address: String },
    /// An inbound PUBLISH arrived.
    PublishReceived(Publish),
    /// An outbound QoS > 0 PUBLISH was acknowledged by the broker.
    PublishConfirmed(Publish),
    /// A packet was written to the transport.
    PacketSent(Packet),
    /// SUBACK arrived; one result code per requested topic.
    SubscribeResult(Vec<(String, SubscribeReasonCode)>),
    /// UNSUBACK arrived for the listed topics.
    UnsubscribeResult(Vec<String>),
    /// The transport went away. `None` means an orderly shutdown.
    Disconnected(Option<SessionError>),
    /// PINGRESP arrived.
    PongReceived,
}

/// Outbound half of the session contract.
///
/// Both methods only queue work on the session's own I/O task and must return without
/// blocking. They must also not call [`EventSink::dispatch`] re-entrantly: `connect` in
/// particular runs while the coordinator holds its state guard. Failures are reported
/// later through [`SessionEvent::Disconnected`], never synchronously.
pub trait Session: Send + 'static {
    /// Dispatch the CONNECT packet that opens the MQTT handshake.
    fn connect(&self, connect: Connect);
    /// Queue any other packet for transmission.
    fn send(&self, packet: Packet);
}

/// Creates one [`Session`] per connection attempt.
pub trait SessionFactory {
    type Session: Session;

    /// Build a session bound to `host:port` that reports its events through `sink`.
    fn create(&self, host: &str, port: u16, sink: EventSink<Self::Session>) -> Self::Session;
}

/// Non-owning handle from a session back into the coordinator.
pub struct EventSink<S> {
    shared: Weak<Shared<S>>,
}

impl<S> Clone for EventSink<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<S: Session> EventSink<S> {
    pub(crate) fn new(shared: Weak<Shared<S>>) -> Self {
        Self { shared }
    }

    /// Deliver one event to the coordinator.
    ///
    /// Events dispatched after the owning [`Client`](crate::client::Client) has been
    /// dropped are silently discarded.
    pub fn dispatch(&self, event: SessionEvent) {
        match self.shared.upgrade() {
            Some(shared) => shared.handle_event(event),
            None => log::debug!("client released, dropping {:?}", event),
        }
    }
}
