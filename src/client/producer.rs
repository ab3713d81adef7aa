use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use parking_lot::RwLock;
use tracing::warn;
use uuid::Uuid;

use crate::client::session::SessionInner;
use crate::destination::Destination;
use crate::message::header::{self, DEFAULT_PRIORITY, DEFAULT_TIME_TO_LIVE, MESSAGE_ID_PREFIX};
use crate::message::{DeliveryMode, Message};
use crate::utils::error::{JmsError, Result};

/// Delivery mode, priority and time-to-live a producer starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProducerDefaults {
    pub delivery_mode: DeliveryMode,
    pub priority: u8,
    pub time_to_live: i64,
}

impl Default for ProducerDefaults {
    fn default() -> Self {
        Self {
            delivery_mode: DeliveryMode::Persistent,
            priority: DEFAULT_PRIORITY,
            time_to_live: DEFAULT_TIME_TO_LIVE,
        }
    }
}

pub(crate) fn validate_time_to_live(ttl: i64) -> Result<i64> {
    if ttl < 0 {
        return Err(JmsError::invalid_argument(format!(
            "time to live must not be negative, got {ttl}"
        )));
    }
    Ok(ttl)
}

#[derive(Debug, Clone)]
struct ProducerConfig {
    delivery_mode: DeliveryMode,
    priority: u8,
    time_to_live: i64,
    disable_message_id: bool,
    disable_message_timestamp: bool,
}

pub(crate) struct ProducerInner {
    session: Arc<SessionInner>,
    destination: Option<Destination>,
    config: RwLock<ProducerConfig>,
    closed: AtomicBool,
}

impl ProducerInner {
    pub(crate) fn shutdown(&self) {
        self.closed.store(true, Ordering::Release);
    }
}

/// Sends messages, either to the destination it was created for or, when unbound, to the
/// destination given with each send
pub struct MessageProducer {
    inner: Arc<ProducerInner>,
}

impl MessageProducer {
    pub(crate) fn new(session: Arc<SessionInner>, destination: Option<Destination>) -> Self {
        let defaults = session.connection.producer_defaults;
        Self {
            inner: Arc::new(ProducerInner {
                session,
                destination,
                config: RwLock::new(ProducerConfig {
                    delivery_mode: defaults.delivery_mode,
                    priority: defaults.priority,
                    time_to_live: defaults.time_to_live,
                    disable_message_id: false,
                    disable_message_timestamp: false,
                }),
                closed: AtomicBool::new(false),
            }),
        }
    }

    pub(crate) fn inner(&self) -> &Arc<ProducerInner> {
        &self.inner
    }

    fn ensure_open(&self) -> Result<()> {
        if self.inner.closed.load(Ordering::Acquire) {
            return Err(JmsError::illegal_state("producer is closed"));
        }
        self.inner.session.ensure_open()
    }

    pub fn destination(&self) -> Option<&Destination> {
        self.inner.destination.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    pub fn delivery_mode(&self) -> DeliveryMode {
        self.inner.config.read().delivery_mode
    }

    pub fn set_delivery_mode(&self, mode: DeliveryMode) -> Result<()> {
        self.ensure_open()?;
        self.inner.config.write().delivery_mode = mode;
        Ok(())
    }

    pub fn priority(&self) -> u8 {
        self.inner.config.read().priority
    }

    pub fn set_priority(&self, priority: i32) -> Result<()> {
        self.ensure_open()?;
        let priority = header::validate_priority(priority)?;
        self.inner.config.write().priority = priority;
        Ok(())
    }

    /// Time to live in milliseconds; `0` means messages never expire.
    pub fn time_to_live(&self) -> i64 {
        self.inner.config.read().time_to_live
    }

    pub fn set_time_to_live(&self, ttl: i64) -> Result<()> {
        self.ensure_open()?;
        let ttl = validate_time_to_live(ttl)?;
        self.inner.config.write().time_to_live = ttl;
        Ok(())
    }

    /// Replaces delivery mode, priority and time to live in one step; a concurrent
    /// send sees either the old or the new triple.
    pub fn configure(
        &self,
        delivery_mode: DeliveryMode,
        priority: i32,
        time_to_live: i64,
    ) -> Result<()> {
        self.ensure_open()?;
        let priority = header::validate_priority(priority)?;
        let time_to_live = validate_time_to_live(time_to_live)?;
        let mut config = self.inner.config.write();
        config.delivery_mode = delivery_mode;
        config.priority = priority;
        config.time_to_live = time_to_live;
        Ok(())
    }

    pub fn disable_message_id(&self) -> bool {
        self.inner.config.read().disable_message_id
    }

    /// Recorded but not honoured: every sent message gets an id.
    pub fn set_disable_message_id(&self, disable: bool) -> Result<()> {
        self.ensure_open()?;
        if disable {
            warn!("disable_message_id is ignored, message ids are always assigned");
        }
        self.inner.config.write().disable_message_id = disable;
        Ok(())
    }

    pub fn disable_message_timestamp(&self) -> bool {
        self.inner.config.read().disable_message_timestamp
    }

    /// Recorded but not honoured: every sent message gets a timestamp.
    pub fn set_disable_message_timestamp(&self, disable: bool) -> Result<()> {
        self.ensure_open()?;
        if disable {
            warn!("disable_message_timestamp is ignored, timestamps are always assigned");
        }
        self.inner.config.write().disable_message_timestamp = disable;
        Ok(())
    }

    /// Sends to the bound destination with the producer's settings.
    pub fn send(&self, message: &mut Message) -> Result<()> {
        self.dispatch(None, message, None)
    }

    /// Sends to the bound destination with explicit settings.
    pub fn send_with(
        &self,
        message: &mut Message,
        delivery_mode: DeliveryMode,
        priority: i32,
        time_to_live: i64,
    ) -> Result<()> {
        self.dispatch(None, message, Some((delivery_mode, priority, time_to_live)))
    }

    /// Sends from an unbound producer.
    pub fn send_to(&self, destination: &Destination, message: &mut Message) -> Result<()> {
        self.dispatch(Some(destination), message, None)
    }

    pub fn send_to_with(
        &self,
        destination: &Destination,
        message: &mut Message,
        delivery_mode: DeliveryMode,
        priority: i32,
        time_to_live: i64,
    ) -> Result<()> {
        self.dispatch(
            Some(destination),
            message,
            Some((delivery_mode, priority, time_to_live)),
        )
    }

    /// Stamps the header and hands a frozen copy to the provider. The
    /// caller's message only gets the new header once the send succeeded.
    fn dispatch(
        &self,
        destination: Option<&Destination>,
        message: &mut Message,
        options: Option<(DeliveryMode, i32, i64)>,
    ) -> Result<()> {
        self.ensure_open()?;
        let target = match (&self.inner.destination, destination) {
            (Some(bound), Some(given)) => {
                return Err(JmsError::unsupported(format!(
                    "producer is bound to {bound}, cannot send to {given}"
                )));
            }
            (None, None) => {
                return Err(JmsError::unsupported(
                    "producer has no destination, one must be given on send",
                ));
            }
            (Some(target), None) | (None, Some(target)) => target.clone(),
        };

        let (delivery_mode, priority, time_to_live) = match options {
            Some((mode, priority, ttl)) => (
                mode,
                header::validate_priority(priority)?,
                validate_time_to_live(ttl)?,
            ),
            None => {
                let config = self.inner.config.read();
                (config.delivery_mode, config.priority, config.time_to_live)
            }
        };

        let now = Utc::now().timestamp_millis();
        let mut stamped = message.header().clone();
        stamped.set_message_id(Some(&format!("{MESSAGE_ID_PREFIX}{}", Uuid::new_v4())))?;
        stamped.set_timestamp(now);
        stamped.set_expiration(if time_to_live == 0 {
            0
        } else {
            now.saturating_add(time_to_live)
        });
        stamped.set_destination(Some(target.clone()));
        stamped.set_delivery_mode(delivery_mode);
        stamped.set_priority(i32::from(priority))?;
        stamped.set_redelivered(false);

        let mut frozen = message.delivery_copy()?;
        *frozen.header_mut() = stamped.clone();

        let session = &self.inner.session;
        session
            .connection
            .provider
            .send(session.ctx(), &target, frozen)?;
        *message.header_mut() = stamped;
        Ok(())
    }

    /// Closes the producer; closing twice is harmless.
    pub fn close(&self) {
        self.inner.shutdown();
    }
}

impl fmt::Debug for MessageProducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageProducer")
            .field("destination", &self.inner.destination)
            .field("closed", &self.is_closed())
            .finish()
    }
}
