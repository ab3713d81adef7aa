use std::sync::Arc;

use parking_lot::RwLock;

use crate::client::connection::Connection;
use crate::client::producer::{ProducerDefaults, validate_time_to_live};
use crate::config::Settings;
use crate::message::DeliveryMode;
use crate::message::header::validate_priority;
use crate::provider::{DEFAULT_URL, ProviderRegistry};
use crate::utils::error::Result;

#[derive(Debug, Clone)]
struct FactoryConfig {
    url: String,
    client_id: Option<String>,
    username: Option<String>,
    password: Option<String>,
    producer: ProducerDefaults,
}

/// Opens connections to the broker its URL points at.
///
/// The URL scheme selects a provider from the registry the factory was
/// built with. Default credentials, a default client id and producer
/// defaults are applied to every connection it creates.
#[derive(Debug)]
pub struct ConnectionFactory {
    registry: Arc<ProviderRegistry>,
    config: RwLock<FactoryConfig>,
}

impl ConnectionFactory {
    /// A factory for [`DEFAULT_URL`].
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self {
            registry,
            config: RwLock::new(FactoryConfig {
                url: DEFAULT_URL.to_string(),
                client_id: None,
                username: None,
                password: None,
                producer: ProducerDefaults::default(),
            }),
        }
    }

    pub fn with_url(registry: Arc<ProviderRegistry>, url: &str) -> Result<Self> {
        let factory = Self::new(registry);
        factory.set_url(url)?;
        Ok(factory)
    }

    /// Builds a factory from the `connection` and `producer` settings.
    ///
    /// # Errors
    ///
    /// `InvalidUrl` for an unusable URL, `InvalidArgument` for an unknown
    /// delivery mode or an out-of-range priority or time to live.
    pub fn from_settings(registry: Arc<ProviderRegistry>, settings: &Settings) -> Result<Self> {
        let factory = Self::with_url(registry, &settings.connection.url)?;
        let producer = ProducerDefaults {
            delivery_mode: settings.producer.delivery_mode.parse::<DeliveryMode>()?,
            priority: validate_priority(settings.producer.priority)?,
            time_to_live: validate_time_to_live(settings.producer.time_to_live_ms)?,
        };
        {
            let mut config = factory.config.write();
            config.client_id = settings.connection.client_id.clone();
            config.username = settings.connection.username.clone();
            config.password = settings.connection.password.clone();
            config.producer = producer;
        }
        Ok(factory)
    }

    pub fn url(&self) -> String {
        self.config.read().url.clone()
    }

    /// Changes the URL after checking that a provider handles its scheme.
    pub fn set_url(&self, url: &str) -> Result<()> {
        self.registry.resolve(url)?;
        self.config.write().url = url.to_string();
        Ok(())
    }

    pub fn client_id(&self) -> Option<String> {
        self.config.read().client_id.clone()
    }

    pub fn set_client_id(&self, client_id: Option<&str>) {
        self.config.write().client_id = client_id.map(str::to_string);
    }

    pub fn username(&self) -> Option<String> {
        self.config.read().username.clone()
    }

    pub fn set_credentials(&self, username: Option<&str>, password: Option<&str>) {
        let mut config = self.config.write();
        config.username = username.map(str::to_string);
        config.password = password.map(str::to_string);
    }

    pub fn producer_defaults(&self) -> ProducerDefaults {
        self.config.read().producer
    }

    pub fn set_producer_defaults(&self, defaults: ProducerDefaults) {
        self.config.write().producer = defaults;
    }

    /// Opens a connection with the factory's default credentials.
    pub fn create_connection(&self) -> Result<Connection> {
        let config = self.config.read().clone();
        self.open(&config, config.username.as_deref(), config.password.as_deref())
    }

    /// Opens a connection with explicit credentials.
    pub fn create_connection_with(
        &self,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<Connection> {
        let config = self.config.read().clone();
        self.open(&config, username, password)
    }

    fn open(
        &self,
        config: &FactoryConfig,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<Connection> {
        let (provider, url) = self.registry.resolve(&config.url)?;
        Connection::open(
            provider,
            &url,
            username,
            password,
            config.client_id.as_deref(),
            config.producer,
        )
    }
}
