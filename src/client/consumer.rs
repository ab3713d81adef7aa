use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, RwLock};
use tracing::warn;
use uuid::Uuid;

use crate::broker::{ConsumerId, Endpoint};
use crate::client::session::SessionInner;
use crate::destination::Destination;
use crate::message::Message;
use crate::utils::error::{JmsError, Result};

/// Callback invoked with each delivered message, on the sender's thread.
pub type MessageListener = Arc<dyn Fn(Message) + Send + Sync>;

pub(crate) struct ConsumerInner {
    id: ConsumerId,
    session: Arc<SessionInner>,
    destination: Option<Destination>,
    attached: Mutex<Vec<Destination>>,
    listener: RwLock<Option<MessageListener>>,
    mailbox: Mutex<HashMap<Destination, VecDeque<Message>>>,
    closed: AtomicBool,
}

impl ConsumerInner {
    fn deliver(&self, from: &Destination, message: Message) {
        if self.closed.load(Ordering::Acquire) {
            return;
        }
        // Clone out of the lock so the listener can replace itself.
        let listener = self.listener.read().clone();
        match listener {
            Some(listener) => listener(message),
            None => self
                .mailbox
                .lock()
                .entry(from.clone())
                .or_default()
                .push_back(message),
        }
    }

    fn attach(self: &Arc<Self>, destination: &Destination) -> Result<()> {
        let mut attached = self.attached.lock();
        if attached.contains(destination) {
            return Ok(());
        }
        let weak = Arc::downgrade(self);
        let from = destination.clone();
        let endpoint: Endpoint = Arc::new(move |message: Message| {
            if let Some(consumer) = weak.upgrade() {
                consumer.deliver(&from, message);
            }
        });
        self.session.connection.provider.register_consumer(
            self.session.ctx(),
            destination,
            &self.id,
            endpoint,
        )?;
        attached.push(destination.clone());
        Ok(())
    }

    /// Unregisters from every attached destination. Returns false when the
    /// consumer was already closed.
    pub(crate) fn shutdown(&self) -> bool {
        if self.closed.swap(true, Ordering::AcqRel) {
            return false;
        }
        let provider = &self.session.connection.provider;
        for destination in self.attached.lock().drain(..) {
            if let Err(err) =
                provider.unregister_consumer(self.session.ctx(), &destination, &self.id)
            {
                warn!(consumer = %self.id, %destination, error = %err, "unregister failed");
            }
        }
        self.listener.write().take();
        self.mailbox.lock().clear();
        true
    }
}

impl Drop for ConsumerInner {
    fn drop(&mut self) {
        // a consumer dropped without close must not stay registered
        self.shutdown();
    }
}

/// Receives messages from a destination
/// Messages go to the listener when one is set and otherwise wait in the consumer's
/// mailbox until read with a non-blocking receive
pub struct MessageConsumer {
    inner: Arc<ConsumerInner>,
}

impl MessageConsumer {
    pub(crate) fn new(session: Arc<SessionInner>, destination: Option<Destination>) -> Result<Self> {
        let inner = Arc::new(ConsumerInner {
            id: format!("consumer-{}", Uuid::new_v4()),
            session,
            destination,
            attached: Mutex::new(Vec::new()),
            listener: RwLock::new(None),
            mailbox: Mutex::new(HashMap::new()),
            closed: AtomicBool::new(false),
        });
        if let Some(destination) = &inner.destination {
            inner.attach(destination)?;
        }
        Ok(Self { inner })
    }

    pub(crate) fn inner(&self) -> &Arc<ConsumerInner> {
        &self.inner
    }

    fn ensure_open(&self) -> Result<()> {
        if self.inner.closed.load(Ordering::Acquire) {
            return Err(JmsError::illegal_state("consumer is closed"));
        }
        self.inner.session.ensure_open()
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn destination(&self) -> Option<&Destination> {
        self.inner.destination.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    pub fn message_listener(&self) -> Option<MessageListener> {
        self.inner.listener.read().clone()
    }

    /// Installs or removes the listener. Messages already in the mailbox
    /// stay there.
    pub fn set_message_listener(&self, listener: Option<MessageListener>) -> Result<()> {
        self.ensure_open()?;
        *self.inner.listener.write() = listener;
        Ok(())
    }

    fn pop(&self, destination: &Destination) -> Option<Message> {
        self.inner
            .mailbox
            .lock()
            .get_mut(destination)
            .and_then(VecDeque::pop_front)
    }

    /// Takes the next waiting message of a bound consumer, if any.
    pub fn receive_no_wait(&self) -> Result<Option<Message>> {
        self.ensure_open()?;
        let destination = self.inner.destination.as_ref().ok_or_else(|| {
            JmsError::unsupported("consumer has no destination, use receive_no_wait_from")
        })?;
        Ok(self.pop(destination))
    }

    /// Takes the next waiting message from `destination` for an unbound
    /// consumer, attaching to it on first use.
    pub fn receive_no_wait_from(&self, destination: &Destination) -> Result<Option<Message>> {
        self.ensure_open()?;
        if let Some(bound) = &self.inner.destination {
            return Err(JmsError::unsupported(format!(
                "consumer is bound to {bound}, use receive_no_wait"
            )));
        }
        self.inner.attach(destination)?;
        Ok(self.pop(destination))
    }

    /// Number of messages waiting in the mailbox.
    pub fn pending(&self) -> usize {
        self.inner.mailbox.lock().values().map(VecDeque::len).sum()
    }

    /// Unregisters the consumer; closing twice is harmless.
    pub fn close(&self) {
        self.inner.shutdown();
    }
}

impl fmt::Debug for MessageConsumer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageConsumer")
            .field("id", &self.inner.id)
            .field("destination", &self.inner.destination)
            .field("closed", &self.is_closed())
            .finish()
    }
}
