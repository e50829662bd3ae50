//! Wiring demo with an in-process stand-in for the transport. A real application
//! plugs in a `SessionFactory` backed by its own TCP/TLS packet I/O.

use std::time::Duration;

use miniqtt::{
    Client, ClientConfig, ClientDelegate, Connect, EventSink, Packet, QoS, Session,
    SessionEvent, SessionFactory, DEFAULT_PORT,
};

/// Accepts every CONNECT and logs outbound packets instead of writing them anywhere.
#[derive(Clone)]
struct FakeSession {
    sink: EventSink<FakeSession>,
}

impl Session for FakeSession {
    fn connect(&self, connect: Connect) {
        log::info!("CONNECT dispatched for {}", connect.client_id);
        // A real session reports from its I/O task; never dispatch from inside
        // `connect` itself.
        let sink = self.sink.clone();
        tokio::spawn(async move {
            sink.dispatch(SessionEvent::Connected {
                address: "127.0.0.1:1883".to_string(),
            });
        });
    }

    fn send(&self, packet: Packet) {
        log::info!("outbound: {:?}", packet);
    }
}

struct FakeFactory;

impl SessionFactory for FakeFactory {
    type Session = FakeSession;

    fn create(&self, host: &str, port: u16, sink: EventSink<FakeSession>) -> FakeSession {
        log::info!("session created for {}:{}", host, port);
        FakeSession { sink }
    }
}

struct PrintDelegate;

impl ClientDelegate for PrintDelegate {
    fn connected(&mut self, address: &str) {
        println!("connected to {}", address);
    }

    fn disconnected(&mut self, error: Option<&miniqtt::SessionError>) {
        println!("disconnected: {:?}", error);
    }
}

#[tokio::main]
async fn main() {
    simple_logger::SimpleLogger::new().init().unwrap();

    let mut config = ClientConfig::new("miniqtt-hello-world");
    config.keep_alive = Duration::from_secs(30);

    let client = Client::new(config, FakeFactory, PrintDelegate);
    client.connect("test.mosquitto.org", DEFAULT_PORT).unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    for x in 1..=10 {
        let result = client.publish("/miniqtt", format!("Hello world {}", x), QoS::AtMostOnce);
        println!("Publish result: {:?}", result);
    }
    client.disconnect();
}
