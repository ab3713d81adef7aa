use serde::Deserialize;

use crate::provider::DEFAULT_URL;

/// Top-level configuration settings for the application.
///
/// Groups connection, session, producer and logging settings.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Settings {
    pub connection: ConnectionSettings,
    pub session: SessionSettings,
    pub producer: ProducerSettings,
    pub logging: LoggingSettings,
}

/// Where and as whom connections are opened.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ConnectionSettings {
    pub url: String,
    pub client_id: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Defaults for sessions created by the CLI.
///
/// `acknowledge_mode` is a name such as `auto_acknowledge` or `client`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SessionSettings {
    pub transacted: bool,
    pub acknowledge_mode: String,
}

/// Defaults every producer starts with.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ProducerSettings {
    pub delivery_mode: String,
    pub priority: i32,
    pub time_to_live_ms: i64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values are filled from defaults.
#[derive(Debug, Deserialize, Default)]
pub struct PartialSettings {
    pub connection: Option<PartialConnectionSettings>,
    pub session: Option<PartialSessionSettings>,
    pub producer: Option<PartialProducerSettings>,
    pub logging: Option<PartialLoggingSettings>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PartialConnectionSettings {
    pub url: Option<String>,
    pub client_id: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PartialSessionSettings {
    pub transacted: Option<bool>,
    pub acknowledge_mode: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PartialProducerSettings {
    pub delivery_mode: Option<String>,
    pub priority: Option<i32>,
    pub time_to_live_ms: Option<i64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PartialLoggingSettings {
    pub level: Option<String>,
}

/// Provides default values for `Settings`.
///
/// A default configuration connects to the `default` vm broker, uses
/// auto-acknowledge sessions and persistent priority-4 messages that never expire.
impl Default for Settings {
    fn default() -> Self {
        Self {
            connection: ConnectionSettings {
                url: DEFAULT_URL.to_string(),
                client_id: None,
                username: None,
                password: None,
            },
            session: SessionSettings {
                transacted: false,
                acknowledge_mode: "auto_acknowledge".to_string(),
            },
            producer: ProducerSettings {
                delivery_mode: "persistent".to_string(),
                priority: 4,
                time_to_live_ms: 0,
            },
            logging: LoggingSettings {
                level: "info".to_string(),
            },
        }
    }
}

impl Settings {
    /// Fills every field `partial` leaves out from `self`.
    pub fn merge(self, partial: PartialSettings) -> Settings {
        let connection = partial.connection.unwrap_or_default();
        let session = partial.session.unwrap_or_default();
        let producer = partial.producer.unwrap_or_default();
        let logging = partial.logging.unwrap_or_default();

        Settings {
            connection: ConnectionSettings {
                url: connection.url.unwrap_or(self.connection.url),
                client_id: connection.client_id.or(self.connection.client_id),
                username: connection.username.or(self.connection.username),
                password: connection.password.or(self.connection.password),
            },
            session: SessionSettings {
                transacted: session.transacted.unwrap_or(self.session.transacted),
                acknowledge_mode: session
                    .acknowledge_mode
                    .unwrap_or(self.session.acknowledge_mode),
            },
            producer: ProducerSettings {
                delivery_mode: producer
                    .delivery_mode
                    .unwrap_or(self.producer.delivery_mode),
                priority: producer.priority.unwrap_or(self.producer.priority),
                time_to_live_ms: producer
                    .time_to_live_ms
                    .unwrap_or(self.producer.time_to_live_ms),
            },
            logging: LoggingSettings {
                level: logging.level.unwrap_or(self.logging.level),
            },
        }
    }
}
