use std::sync::Weak;
use std::time::Duration;

use mqttbytes::v4::Packet;
use tokio::task::JoinHandle;

use crate::client::Shared;
use crate::session::Session;

/// Sends PINGREQ at the keep alive period while the session is connected.
///
/// At most one ticker task exists per client; `start` cancels any previous ticker
/// before scheduling a new one, and `stop` is called on every disconnect path.
pub(crate) struct Heartbeat {
    ticker: Option<JoinHandle<()>>,
}

impl Heartbeat {
    pub fn new() -> Self {
        Self { ticker: None }
    }

    /// (Re)start the ticker. A zero period disables the heartbeat entirely; the broker
    /// side treats keep alive 0 as "no timeout enforcement" so there is nothing to feed.
    pub fn start<S: Session>(&mut self, period: Duration, shared: Weak<Shared<S>>) {
        self.stop();
        if period.is_zero() {
            log::debug!("keep alive is zero, heartbeat disabled");
            return;
        }

        self.ticker = Some(tokio::spawn(async move {
            let first = tokio::time::Instant::now() + period;
            let mut ticks = tokio::time::interval_at(first, period);
            loop {
                ticks.tick().await;
                let shared = match shared.upgrade() {
                    Some(shared) => shared,
                    None => return,
                };
                log::debug!("writing ping request");
                if shared.send(Packet::PingReq).is_err() {
                    // Best effort: a genuine transport failure surfaces through the
                    // session's disconnect event instead.
                    log::debug!("ping request skipped, no active session");
                }
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl Drop for Heartbeat {
    fn drop(&mut self) {
        self.stop();
    }
}
