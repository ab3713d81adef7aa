use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::debug;

use crate::client::acknowledge::AcknowledgeMode;
use crate::client::connection::ConnectionInner;
use crate::client::consumer::{ConsumerInner, MessageConsumer};
use crate::client::producer::{MessageProducer, ProducerInner};
use crate::destination::{Destination, DestinationKind};
use crate::message::{Message, MessageKind};
use crate::provider::ConnectionContext;
use crate::utils::error::{JmsError, Result};

pub(crate) struct SessionInner {
    id: String,
    pub(crate) connection: Arc<ConnectionInner>,
    transacted: bool,
    mode: AcknowledgeMode,
    open: AtomicBool,
    producers: Mutex<Vec<Weak<ProducerInner>>>,
    consumers: Mutex<Vec<Weak<ConsumerInner>>>,
}

impl SessionInner {
    pub(crate) fn ensure_open(&self) -> Result<()> {
        if !self.open.load(Ordering::Acquire) {
            return Err(JmsError::illegal_state("session is closed"));
        }
        Ok(())
    }

    pub(crate) fn ctx(&self) -> &ConnectionContext {
        &self.connection.ctx
    }

    /// Marks the session closed and closes its producers and consumers.
    /// Returns false when it was already closed.
    pub(crate) fn shutdown(&self) -> bool {
        if !self.open.swap(false, Ordering::AcqRel) {
            return false;
        }
        for producer in self.producers.lock().drain(..) {
            if let Some(producer) = producer.upgrade() {
                producer.shutdown();
            }
        }
        for consumer in self.consumers.lock().drain(..) {
            if let Some(consumer) = consumer.upgrade() {
                consumer.shutdown();
            }
        }
        debug!(session = %self.id, "session closed");
        true
    }
}

/// A single-threaded context for producing and consuming messages
/// Creates messages, destinations, producers and consumers; its acknowledge mode is fixed
/// at creation
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    pub(crate) fn new(
        id: String,
        connection: Arc<ConnectionInner>,
        transacted: bool,
        mode: AcknowledgeMode,
    ) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                id,
                connection,
                transacted,
                mode,
                open: AtomicBool::new(true),
                producers: Mutex::new(Vec::new()),
                consumers: Mutex::new(Vec::new()),
            }),
        }
    }

    pub(crate) fn inner(&self) -> &Arc<SessionInner> {
        &self.inner
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn acknowledge_mode(&self) -> AcknowledgeMode {
        self.inner.mode
    }

    pub fn transacted(&self) -> bool {
        self.inner.transacted
    }

    pub fn is_open(&self) -> bool {
        self.inner.open.load(Ordering::Acquire)
    }

    /// Producer and consumer handles the session tracks for close.
    pub(crate) fn tracked_handles(&self) -> (usize, usize) {
        (
            self.inner.producers.lock().len(),
            self.inner.consumers.lock().len(),
        )
    }

    /// Closes the session with its producers and consumers and removes it
    /// from the connection. A second close fails with `IllegalState`.
    pub fn close(&self) -> Result<()> {
        if !self.inner.shutdown() {
            return Err(JmsError::illegal_state("session is already closed"));
        }
        self.inner.connection.forget_session(&self.inner.id);
        Ok(())
    }

    fn new_message(&self, kind: MessageKind) -> Result<Message> {
        self.inner.ensure_open()?;
        Ok(Message::new(kind))
    }

    pub fn create_message(&self) -> Result<Message> {
        self.new_message(MessageKind::Plain)
    }

    pub fn create_text_message(&self, text: Option<&str>) -> Result<Message> {
        let mut message = self.new_message(MessageKind::Text)?;
        message.as_text_mut()?.set_text(text)?;
        Ok(message)
    }

    pub fn create_bytes_message(&self) -> Result<Message> {
        self.new_message(MessageKind::Bytes)
    }

    pub fn create_map_message(&self) -> Result<Message> {
        self.new_message(MessageKind::Map)
    }

    pub fn create_stream_message(&self) -> Result<Message> {
        self.new_message(MessageKind::Stream)
    }

    pub fn create_object_message(&self) -> Result<Message> {
        self.new_message(MessageKind::Object)
    }

    pub fn create_queue(&self, name: &str) -> Result<Destination> {
        self.inner.ensure_open()?;
        self.inner
            .connection
            .provider
            .create_queue(self.inner.ctx(), name)
    }

    pub fn create_topic(&self, name: &str) -> Result<Destination> {
        self.inner.ensure_open()?;
        self.inner
            .connection
            .provider
            .create_topic(self.inner.ctx(), name)
    }

    pub fn create_temporary_queue(&self) -> Result<Destination> {
        self.create_temporary(DestinationKind::Queue)
    }

    pub fn create_temporary_topic(&self) -> Result<Destination> {
        self.create_temporary(DestinationKind::Topic)
    }

    fn create_temporary(&self, kind: DestinationKind) -> Result<Destination> {
        self.inner.ensure_open()?;
        self.inner
            .connection
            .provider
            .create_temporary_destination(self.inner.ctx(), kind)
    }

    /// Deletes a temporary destination created by this session's connection.
    pub fn delete_temporary_destination(&self, destination: &Destination) -> Result<()> {
        self.inner.ensure_open()?;
        self.inner
            .connection
            .provider
            .delete_temporary_destination(self.inner.ctx(), destination)
    }

    /// Creates a producer, bound to `destination` when one is given.
    pub fn create_producer(&self, destination: Option<&Destination>) -> Result<MessageProducer> {
        self.inner.ensure_open()?;
        let producer = MessageProducer::new(self.inner.clone(), destination.cloned());
        let mut producers = self.inner.producers.lock();
        producers.retain(|p| p.strong_count() > 0);
        producers.push(Arc::downgrade(producer.inner()));
        drop(producers);
        Ok(producer)
    }

    /// Creates a consumer. A bound consumer is registered with the broker
    /// right away; an unbound one attaches on its first
    /// [`receive_no_wait_from`](MessageConsumer::receive_no_wait_from).
    pub fn create_consumer(&self, destination: Option<&Destination>) -> Result<MessageConsumer> {
        self.inner.ensure_open()?;
        let consumer = MessageConsumer::new(self.inner.clone(), destination.cloned())?;
        let mut consumers = self.inner.consumers.lock();
        consumers.retain(|c| c.strong_count() > 0);
        consumers.push(Arc::downgrade(consumer.inner()));
        drop(consumers);
        Ok(consumer)
    }

    fn transaction_stub(&self, operation: &str) -> Result<()> {
        self.inner.ensure_open()?;
        if !self.inner.transacted {
            return Err(JmsError::illegal_state(format!(
                "{operation} called on a non-transacted session"
            )));
        }
        Err(JmsError::unsupported(format!(
            "{operation} is not supported"
        )))
    }

    pub fn commit(&self) -> Result<()> {
        self.transaction_stub("commit")
    }

    pub fn rollback(&self) -> Result<()> {
        self.transaction_stub("rollback")
    }

    pub fn recover(&self) -> Result<()> {
        self.transaction_stub("recover")
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.inner.id)
            .field("transacted", &self.inner.transacted)
            .field("acknowledge_mode", &self.inner.mode)
            .field("open", &self.is_open())
            .finish()
    }
}
