use std::time::Duration;

use mqttbytes::v4::{Connect, LastWill, Login};

/// Default MQTT port for plain TCP. Brokers conventionally serve TLS on 8883,
/// but nothing in this crate enforces that.
pub const DEFAULT_PORT: u16 = 1883;

/// Configuration values for setting up a client.
///
/// Immutable once the client has been constructed.
#[derive(Clone, PartialEq, Debug)]
pub struct ClientConfig {
    pub client_id: String,
    pub login: Option<Login>,
    pub keep_alive: Duration,
    pub clean_session: bool,
    pub last_will: Option<LastWill>,
}

impl ClientConfig {
    /// Create a new [`ClientConfig`].
    ///
    /// The following default values are used:
    ///
    /// * `login`: `None`
    /// * `keep_alive`: 5 minutes
    /// * `clean_session`: `false`
    /// * `last_will`: `None`
    ///
    /// # Arguments
    ///
    /// * `client_id`: The client ID to use in the `CONNECT` message.
    ///
    /// `client_id` is not verified in any way to be conforming to the MQTT specification.
    ///
    /// returns: `ClientConfig`
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::time::Duration;
    /// # use miniqtt::config::ClientConfig;
    /// let config = ClientConfig::new("miniqtt-client");
    /// assert_eq!(config, ClientConfig {
    ///     client_id: "miniqtt-client".to_string(),
    ///     login: None,
    ///     keep_alive: Duration::from_secs(5 * 60),
    ///     clean_session: false,
    ///     last_will: None,
    /// });
    /// ```
    pub fn new<S: ToString>(client_id: S) -> Self {
        ClientConfig {
            client_id: client_id.to_string(),
            login: None,
            keep_alive: Duration::from_secs(5 * 60),
            clean_session: false,
            last_will: None,
        }
    }

    /// Keep alive in whole seconds, clamped to what the CONNECT packet can carry.
    pub(crate) fn keep_alive_secs(&self) -> u16 {
        self.keep_alive.as_secs().min(u16::MAX as u64) as u16
    }

    /// Period between outgoing ping requests. Zero disables the heartbeat.
    pub(crate) fn heartbeat_period(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs() as u64)
    }

    pub(crate) fn to_connect(&self) -> Connect {
        let mut connect = Connect::new(self.client_id.clone());
        connect.clean_session = self.clean_session;
        connect.keep_alive = self.keep_alive_secs();
        connect.login = self.login.clone();
        connect.last_will = self.last_will.clone();
        connect
    }
}
