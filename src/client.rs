//! The client-side session coordinator.
//!
//! A [`Client`] translates application requests into MQTT packets and hands them to the
//! active [`Session`]; session events flow back through the [`EventSink`] the session
//! was constructed with and are forwarded, one to one, to the application's
//! [`ClientDelegate`].
//!
//! Every operation returns as soon as it has either dispatched a packet or failed a
//! local precondition check. A `publish` that returns `Ok` only means the packet was
//! handed to the session; acknowledgments arrive later through the delegate. There is
//! no automatic reconnection: after a disconnect the application calls
//! [`Client::connect`] again.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use mqttbytes::v4::{Packet, Publish, Subscribe, SubscribeFilter, Unsubscribe};
use mqttbytes::QoS;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::ClientConfig;
use crate::delegate::{forward_events, ClientDelegate};
use crate::session::{EventSink, Session, SessionError, SessionEvent, SessionFactory};

mod heartbeat;
mod packet_id;

use heartbeat::Heartbeat;
use packet_id::PacketIdCounter;

/// Synchronous precondition failures. Transport-level failures are never reported
/// through these; they arrive through the delegate's `disconnected` callback.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("already connected to a broker")]
    AlreadyConnected,
    #[error("a connect attempt is already in progress")]
    AlreadyConnecting,
    /// Reserved for send-guard extensions on terminally disconnected clients.
    #[error("the session has disconnected")]
    HasDisconnected,
    #[error("not connected to a broker")]
    NotConnected,
}

/// Connection state of a client. Exactly one value holds at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// The broker rejected the connection. Terminal for this session.
    Denied,
    /// Constructed, no connect attempt yet.
    Initialization,
    /// CONNECT dispatched, waiting for the broker's acknowledgment.
    Connecting,
    /// The broker accepted the connection.
    Connected,
    /// The session ended; no further sends are permitted until a new `connect`.
    Disconnected,
}

struct Inner<S> {
    state: SessionState,
    session: Option<S>,
    heartbeat: Heartbeat,
}

/// State shared between the client, the heartbeat ticker and the event sinks handed to
/// sessions. The state value and the active session reference only change under the
/// mutex; the guard is never held across a delegate call.
pub(crate) struct Shared<S> {
    config: ClientConfig,
    inner: Mutex<Inner<S>>,
    packet_ids: PacketIdCounter,
    delegate_tx: mpsc::UnboundedSender<SessionEvent>,
}

impl<S: Session> Shared<S> {
    fn lock(&self) -> MutexGuard<'_, Inner<S>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Guarded send routine. Fails unless a session exists and the state is
    /// [`SessionState::Connected`].
    pub(crate) fn send(&self, packet: Packet) -> Result<(), ClientError> {
        let inner = self.lock();
        match (&inner.session, inner.state) {
            (Some(session), SessionState::Connected) => {
                session.send(packet);
                Ok(())
            }
            _ => Err(ClientError::NotConnected),
        }
    }

    /// Session-reported transitions, invoked by [`EventSink::dispatch`]. Updates the
    /// guarded state first, then forwards the event to the delegate task.
    pub(crate) fn handle_event(self: &Arc<Self>, event: SessionEvent) {
        match &event {
            SessionEvent::Connected { address } => {
                log::debug!("session connected to {}", address);
                let mut inner = self.lock();
                inner.state = SessionState::Connected;
                let period = self.config.heartbeat_period();
                inner.heartbeat.start(period, Arc::downgrade(self));
            }
            SessionEvent::Disconnected(error) => {
                log::debug!("session disconnected: {:?}", error);
                let mut inner = self.lock();
                inner.heartbeat.stop();
                inner.session = None;
                inner.state = match error {
                    Some(SessionError::ConnectionRejected(_)) => SessionState::Denied,
                    _ => SessionState::Disconnected,
                };
            }
            _ => {}
        }

        if self.delegate_tx.send(event).is_err() {
            log::debug!("delegate task gone, event dropped");
        }
    }
}

/// The public-facing session coordinator.
///
/// Holds the configuration, the current [`SessionState`], the active session for one
/// connection attempt and the heartbeat ticker. Must be constructed inside a tokio
/// runtime; the delegate forwarding task is spawned at construction and aborted when
/// the client is dropped, silently discarding any pending delegate calls.
pub struct Client<F: SessionFactory> {
    shared: Arc<Shared<F::Session>>,
    factory: F,
    forwarder: JoinHandle<()>,
}

impl<F: SessionFactory> Client<F> {
    pub fn new<D: ClientDelegate>(config: ClientConfig, factory: F, delegate: D) -> Self {
        let (delegate_tx, delegate_rx) = mpsc::unbounded_channel();
        let forwarder = tokio::spawn(forward_events(delegate_rx, Box::new(delegate)));
        Self {
            shared: Arc::new(Shared {
                config,
                inner: Mutex::new(Inner {
                    state: SessionState::Initialization,
                    session: None,
                    heartbeat: Heartbeat::new(),
                }),
                packet_ids: PacketIdCounter::new(),
                delegate_tx,
            }),
            factory,
            forwarder,
        }
    }

    /// Current connection state.
    pub fn state(&self) -> SessionState {
        self.shared.lock().state
    }

    pub fn is_connected(&self) -> bool {
        self.state() == SessionState::Connected
    }

    /// Open a connection to `host:port`.
    ///
    /// Creates a fresh session through the factory, dispatches CONNECT to it and marks
    /// the state [`SessionState::Connecting`]. The whole operation runs under the state
    /// guard, so concurrent `connect` calls cannot race the precondition checks.
    ///
    /// The outcome arrives asynchronously: the delegate's `connected` callback on
    /// acceptance, or `disconnected` if the session fails or the broker refuses. A
    /// CONNECT that is never answered leaves the state `Connecting`.
    pub fn connect(&self, host: &str, port: u16) -> Result<(), ClientError> {
        let mut inner = self.shared.lock();
        match inner.state {
            SessionState::Connected => return Err(ClientError::AlreadyConnected),
            SessionState::Connecting => return Err(ClientError::AlreadyConnecting),
            _ => {}
        }

        log::debug!("connecting to {}:{}", host, port);
        let sink = EventSink::new(Arc::downgrade(&self.shared));
        let session = self.factory.create(host, port, sink);
        session.connect(self.shared.config.to_connect());
        inner.session = Some(session);
        inner.state = SessionState::Connecting;
        Ok(())
    }

    /// Close the connection gracefully.
    ///
    /// Sends DISCONNECT, stops the heartbeat, drops the session and marks the state
    /// [`SessionState::Disconnected`]. Calling this while not connected does nothing:
    /// no packet, no state change, no delegate call.
    pub fn disconnect(&self) {
        let mut inner = self.shared.lock();
        if inner.state != SessionState::Connected {
            return;
        }

        log::debug!("disconnecting");
        if let Some(session) = inner.session.take() {
            session.send(Packet::Disconnect);
        }
        inner.heartbeat.stop();
        inner.state = SessionState::Disconnected;
    }

    /// Publish `payload` to `topic`.
    ///
    /// A packet identifier is allocated for QoS above [`QoS::AtMostOnce`].
    /// Acknowledgment, when the QoS calls for one, arrives through the delegate's
    /// `publish_confirmed` callback.
    pub fn publish<T, P>(&self, topic: T, payload: P, qos: QoS) -> Result<(), ClientError>
    where
        T: Into<String>,
        P: Into<Vec<u8>>,
    {
        let mut publish = Publish::new(topic, qos, payload);
        if qos != QoS::AtMostOnce {
            publish.pkid = self.shared.packet_ids.next();
        }
        log::debug!(
            "publishing {} bytes to {}",
            publish.payload.len(),
            publish.topic
        );
        self.shared.send(Packet::Publish(publish))
    }

    /// Publish a text payload to `topic`, encoded as UTF-8.
    pub fn publish_text<T: Into<String>>(
        &self,
        topic: T,
        text: &str,
        qos: QoS,
    ) -> Result<(), ClientError> {
        self.publish(topic, text, qos)
    }

    /// Subscribe to a single topic filter. The result codes arrive through the
    /// delegate's `subscribe_result` callback.
    pub fn subscribe<T: Into<String>>(&self, topic: T, qos: QoS) -> Result<(), ClientError> {
        let subscribe = Subscribe {
            pkid: self.shared.packet_ids.next(),
            filters: vec![SubscribeFilter::new(topic.into(), qos)],
        };
        self.shared.send(Packet::Subscribe(subscribe))
    }

    /// Unsubscribe from the given topics.
    pub fn unsubscribe<I>(&self, topics: I) -> Result<(), ClientError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let unsubscribe = Unsubscribe {
            pkid: self.shared.packet_ids.next(),
            topics: topics.into_iter().map(Into::into).collect(),
        };
        self.shared.send(Packet::Unsubscribe(unsubscribe))
    }

    /// Send a PINGREQ outside the heartbeat schedule.
    pub fn ping(&self) -> Result<(), ClientError> {
        self.shared.send(Packet::PingReq)
    }
}

impl<F: SessionFactory> Drop for Client<F> {
    fn drop(&mut self) {
        self.forwarder.abort();
    }
}
