//! Application-facing event delivery.
//!
//! Every [`SessionEvent`] is translated 1:1 into a [`ClientDelegate`] call. Delivery is
//! always asynchronous and always happens on one forwarding task spawned when the client
//! is constructed, so delegate code never runs on the session's I/O task.

use mqttbytes::v4::{Packet, Publish, SubscribeReasonCode};
use tokio::sync::mpsc;

use crate::session::{SessionError, SessionEvent};

/// Receiver of client lifecycle and message events.
///
/// All methods have default implementations that do nothing, so an application only
/// implements the callbacks it cares about.
pub trait ClientDelegate: Send + 'static {
    /// The broker accepted the connection.
    #[allow(unused_variables)]
    fn connected(&mut self, address: &str) {}

    /// An inbound PUBLISH arrived on a subscribed topic.
    #[allow(unused_variables)]
    fn message_received(&mut self, publish: &Publish) {}

    /// A QoS > 0 PUBLISH of ours was acknowledged by the broker.
    #[allow(unused_variables)]
    fn publish_confirmed(&mut self, publish: &Publish) {}

    /// A packet was written to the transport.
    #[allow(unused_variables)]
    fn packet_sent(&mut self, packet: &Packet) {}

    /// SUBACK arrived; one result code per requested topic.
    #[allow(unused_variables)]
    fn subscribe_result(&mut self, results: &[(String, SubscribeReasonCode)]) {}

    /// UNSUBACK arrived for the listed topics.
    #[allow(unused_variables)]
    fn unsubscribe_result(&mut self, topics: &[String]) {}

    /// The session ended. `error` is `None` for an orderly shutdown.
    #[allow(unused_variables)]
    fn disconnected(&mut self, error: Option<&SessionError>) {}

    /// PINGRESP arrived.
    fn pong_received(&mut self) {}
}

/// Forwarding loop; runs until every sender is gone or the client aborts it on drop.
pub(crate) async fn forward_events(
    mut events: mpsc::UnboundedReceiver<SessionEvent>,
    mut delegate: Box<dyn ClientDelegate>,
) {
    while let Some(event) = events.recv().await {
        match event {
            SessionEvent::Connected { address } => delegate.connected(&address),
            SessionEvent::PublishReceived(publish) => delegate.message_received(&publish),
            SessionEvent::PublishConfirmed(publish) => delegate.publish_confirmed(&publish),
            SessionEvent::PacketSent(packet) => delegate.packet_sent(&packet),
            SessionEvent::SubscribeResult(results) => delegate.subscribe_result(&results),
            SessionEvent::UnsubscribeResult(topics) => delegate.unsubscribe_result(&topics),
            SessionEvent::Disconnected(error) => delegate.disconnected(error.as_ref()),
            SessionEvent::PongReceived => delegate.pong_received(),
        }
    }
}
