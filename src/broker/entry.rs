use std::fmt;
use std::sync::Arc;

use crate::message::Message;

pub type ConsumerId = String;
pub type ConnectionId = String;

/// Callback the broker invokes to hand a message to a consumer.
pub type Endpoint = Arc<dyn Fn(Message) + Send + Sync>;

/// A consumer attached to a destination.
#[derive(Clone)]
pub struct Registration {
    pub id: ConsumerId,
    pub endpoint: Endpoint,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration").field("id", &self.id).finish()
    }
}

/// Broker-side state of one interned destination
/// Keeps its consumers in registration order, which is also delivery order
/// Temporary destinations remember the connection that created them
#[derive(Debug, Default)]
pub struct DestinationEntry {
    pub owner: Option<ConnectionId>,
    pub consumers: Vec<Registration>,
}

impl DestinationEntry {
    pub fn new(owner: Option<ConnectionId>) -> Self {
        Self {
            owner,
            consumers: Vec::new(),
        }
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.consumers.iter().any(|r| r.id == id)
    }

    /// Appends a registration; the caller checks for duplicates first
    pub fn register(&mut self, registration: Registration) {
        self.consumers.push(registration);
    }

    /// Removes the consumer if present, returns whether it was registered
    pub fn unregister(&mut self, id: &str) -> bool {
        let before = self.consumers.len();
        self.consumers.retain(|r| r.id != id);
        self.consumers.len() != before
    }

    /// Copies the endpoints so they can be invoked without holding the broker lock
    pub fn snapshot(&self) -> Vec<Endpoint> {
        self.consumers.iter().map(|r| r.endpoint.clone()).collect()
    }
}
