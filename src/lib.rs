//! A small, opinionated MQTT client session coordinator. It strives to expose a small
//! set of features but still be easy to use.
//!
//! The coordinator owns the connection lifecycle, allocates packet identifiers, keeps
//! the connection alive with periodic ping requests and forwards every broker event to
//! an application [`ClientDelegate`] on a dedicated tokio task.
//!
//! Wire encoding and the transport itself are deliberately not part of this crate:
//! packets are [`mqttbytes`] values, and the transport is any [`Session`] implementation
//! handed in through a [`SessionFactory`]. Transport failures never surface through the
//! call that happened to be in flight; they arrive later through the delegate's
//! `disconnected` callback.
//!
//! ## Examples
//!
//! ```no_run
//! # tokio_test::block_on(async {
//! use miniqtt::{Client, ClientConfig, QoS, DEFAULT_PORT};
//! # use miniqtt::{ClientDelegate, Connect, EventSink, Packet, Session, SessionFactory};
//! # struct Transport; // stand-in for a real TCP-backed session
//! # impl Session for Transport {
//! #     fn connect(&self, _: Connect) {}
//! #     fn send(&self, _: Packet) {}
//! # }
//! # struct TransportFactory;
//! # impl SessionFactory for TransportFactory {
//! #     type Session = Transport;
//! #     fn create(&self, _: &str, _: u16, _: EventSink<Transport>) -> Transport {
//! #         Transport
//! #     }
//! # }
//! # struct Delegate;
//! # impl ClientDelegate for Delegate {}
//! let config = ClientConfig::new("miniqtt-client");
//! let client = Client::new(config, TransportFactory, Delegate);
//! client.connect("test.mosquitto.org", DEFAULT_PORT).unwrap();
//! // The delegate's `connected` callback fires once the broker accepts.
//! client.publish("/miniqtt", "hello", QoS::AtMostOnce).ok();
//! # });
//! ```

pub mod client;
pub mod config;
pub mod delegate;
pub mod session;

pub use client::{Client, ClientError, SessionState};
pub use config::{ClientConfig, DEFAULT_PORT};
pub use delegate::ClientDelegate;
pub use session::{EventSink, Session, SessionError, SessionEvent, SessionFactory};

pub use mqttbytes::v4::{Connect, LastWill, Login, Packet, Publish, SubscribeReasonCode};
pub use mqttbytes::QoS;
