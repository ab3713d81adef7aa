use std::collections::HashMap;
use std::fmt;

use parking_lot::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::broker::entry::{ConnectionId, ConsumerId, DestinationEntry, Endpoint, Registration};
use crate::destination::{Destination, DestinationKind};
use crate::message::Message;
use crate::utils::error::{JmsError, Result};

/// Identity token a broker receives at creation
/// Two brokers with the same name but different ids are different brokers, which is
/// how connections notice that their broker was removed and recreated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BrokerId(Uuid);

impl BrokerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BrokerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BrokerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Default)]
struct BrokerState {
    destinations: HashMap<Destination, DestinationEntry>,
    // (kind, lowercased name) -> first interned spelling
    names: HashMap<(DestinationKind, String), Destination>,
    client_ids: HashMap<String, ConnectionId>,
}

/// Represents an in-process broker
/// Interns destinations, keeps the consumers registered on each of them and delivers
/// messages to those consumers on the sender's thread
/// All state sits behind one mutex; delivery copies the consumer list under the lock and
/// invokes the endpoints after releasing it, so an endpoint may send again
#[derive(Debug)]
pub struct VmBroker {
    name: String,
    id: BrokerId,
    state: Mutex<BrokerState>,
}

impl VmBroker {
    /// Creates an empty broker with a fresh identity
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            id: BrokerId::new(),
            state: Mutex::new(BrokerState::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> BrokerId {
        self.id
    }

    /// Interns a queue or topic
    /// Names match case-insensitively: asking for `orders` after `Orders` was interned
    /// returns the `Orders` destination
    pub fn create_destination(&self, name: &str, kind: DestinationKind) -> Result<Destination> {
        if name.is_empty() {
            return Err(JmsError::invalid_destination("destination name must not be empty"));
        }
        let key = (kind, name.to_lowercase());
        let mut state = self.state.lock();
        if let Some(existing) = state.names.get(&key) {
            return Ok(existing.clone());
        }
        let destination = match kind {
            DestinationKind::Queue => Destination::queue(name),
            DestinationKind::Topic => Destination::topic(name),
        };
        state
            .destinations
            .insert(destination.clone(), DestinationEntry::new(None));
        state.names.insert(key, destination.clone());
        debug!(broker = %self.name, %destination, "interned destination");
        Ok(destination)
    }

    /// Interns a uniquely named temporary destination owned by `owner`
    pub fn create_temporary(&self, kind: DestinationKind, owner: &str) -> Destination {
        let destination = Destination::temporary(format!("temp-{}", Uuid::new_v4()), kind);
        self.state.lock().destinations.insert(
            destination.clone(),
            DestinationEntry::new(Some(owner.to_string())),
        );
        debug!(broker = %self.name, %destination, owner, "created temporary destination");
        destination
    }

    /// Deletes a temporary destination
    /// Fails when it was already deleted, when `owner` did not create it or while consumers
    /// are still attached
    pub fn delete_temporary(&self, destination: &Destination, owner: &str) -> Result<()> {
        if !destination.is_temporary() {
            return Err(JmsError::invalid_destination(format!(
                "{destination} is not a temporary destination"
            )));
        }
        let mut state = self.state.lock();
        let entry = state.destinations.get(destination).ok_or_else(|| {
            JmsError::invalid_destination(format!("{destination} does not exist"))
        })?;
        if entry.owner.as_deref() != Some(owner) {
            return Err(JmsError::illegal_state(format!(
                "{destination} belongs to another connection"
            )));
        }
        if !entry.consumers.is_empty() {
            return Err(JmsError::illegal_state(format!(
                "{destination} still has {} consumer(s)",
                entry.consumers.len()
            )));
        }
        state.destinations.remove(destination);
        info!(broker = %self.name, %destination, "deleted temporary destination");
        Ok(())
    }

    /// Attaches a consumer to an interned destination
    /// A consumer can be attached to a destination once; temporary destinations only
    /// accept consumers of the connection that created them
    pub fn register_consumer(
        &self,
        destination: &Destination,
        id: &str,
        owner: &str,
        endpoint: Endpoint,
    ) -> Result<()> {
        let mut state = self.state.lock();
        let entry = state
            .destinations
            .get_mut(destination)
            .ok_or_else(|| not_interned(destination, &self.name))?;
        if let Some(entry_owner) = &entry.owner {
            if entry_owner != owner {
                return Err(JmsError::illegal_state(format!(
                    "{destination} can only be consumed by the connection that created it"
                )));
            }
        }
        if entry.is_registered(id) {
            return Err(JmsError::illegal_state(format!(
                "consumer {id} is already registered on {destination}"
            )));
        }
        entry.register(Registration {
            id: id.to_string(),
            endpoint,
        });
        debug!(broker = %self.name, %destination, consumer = id, "registered consumer");
        Ok(())
    }

    /// Detaches a consumer; detaching one that is not attached does nothing
    pub fn unregister_consumer(&self, destination: &Destination, id: &str) -> Result<()> {
        let mut state = self.state.lock();
        let entry = state
            .destinations
            .get_mut(destination)
            .ok_or_else(|| not_interned(destination, &self.name))?;
        if entry.unregister(id) {
            debug!(broker = %self.name, %destination, consumer = id, "unregistered consumer");
        }
        Ok(())
    }

    /// Delivers `message` to every consumer of `destination`, in registration order
    /// Queues fan out like topics. Each consumer gets its own clone of the message.
    /// Returns how many consumers were invoked
    pub fn send(&self, destination: &Destination, message: Message) -> Result<usize> {
        let endpoints = {
            let state = self.state.lock();
            state
                .destinations
                .get(destination)
                .ok_or_else(|| not_interned(destination, &self.name))?
                .snapshot()
        };
        for endpoint in &endpoints {
            endpoint(message.clone());
        }
        Ok(endpoints.len())
    }

    /// Records `client_id` as used by `owner`; reclaiming one's own id is allowed
    pub fn claim_client_id(&self, client_id: &str, owner: &str) -> Result<()> {
        if client_id.is_empty() {
            return Err(JmsError::InvalidClientId(
                "client id must not be empty".to_string(),
            ));
        }
        let mut state = self.state.lock();
        match state.client_ids.get(client_id) {
            Some(holder) if holder != owner => Err(JmsError::InvalidClientId(format!(
                "client id {client_id:?} is already in use"
            ))),
            Some(_) => Ok(()),
            None => {
                state
                    .client_ids
                    .insert(client_id.to_string(), owner.to_string());
                Ok(())
            }
        }
    }

    pub fn release_client_id(&self, client_id: &str, owner: &str) {
        let mut state = self.state.lock();
        if state.client_ids.get(client_id).map(String::as_str) == Some(owner) {
            state.client_ids.remove(client_id);
        }
    }

    /// Drops everything a closing connection held: its temporary destinations, with
    /// their consumers, and its client ids
    pub fn release_connection(&self, owner: &str) {
        let mut state = self.state.lock();
        let before = state.destinations.len();
        state
            .destinations
            .retain(|_, entry| entry.owner.as_deref() != Some(owner));
        let dropped = before - state.destinations.len();
        state.client_ids.retain(|_, holder| holder != owner);
        debug!(broker = %self.name, connection = owner, dropped, "released connection");
    }

    pub fn is_interned(&self, destination: &Destination) -> bool {
        self.state.lock().destinations.contains_key(destination)
    }

    pub fn consumer_count(&self, destination: &Destination) -> usize {
        self.state
            .lock()
            .destinations
            .get(destination)
            .map_or(0, |entry| entry.consumers.len())
    }

    pub fn consumer_ids(&self, destination: &Destination) -> Vec<ConsumerId> {
        self.state
            .lock()
            .destinations
            .get(destination)
            .map(|entry| entry.consumers.iter().map(|r| r.id.clone()).collect())
            .unwrap_or_default()
    }
}

fn not_interned(destination: &Destination, broker: &str) -> JmsError {
    JmsError::invalid_destination(format!(
        "{destination} was not created through broker {broker}"
    ))
}
