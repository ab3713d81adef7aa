use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

use crate::broker::engine::{BrokerId, VmBroker};
use crate::utils::error::{JmsError, Result};

/// Name → broker map shared by every `vm` connection of a provider
#[derive(Debug, Default)]
pub struct BrokerRegistry {
    brokers: Mutex<HashMap<String, Arc<VmBroker>>>,
}

impl BrokerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the broker called `name`, creating it on first use
    pub fn get_or_create(&self, name: &str) -> Arc<VmBroker> {
        let mut brokers = self.brokers.lock();
        brokers
            .entry(name.to_string())
            .or_insert_with(|| {
                let broker = Arc::new(VmBroker::new(name));
                info!(broker = name, id = %broker.id(), "created broker");
                broker
            })
            .clone()
    }

    pub fn get(&self, name: &str) -> Option<Arc<VmBroker>> {
        self.brokers.lock().get(name).cloned()
    }

    /// Finds the broker a connection was opened against
    /// Fails when the broker is gone or was replaced by one with another identity
    pub fn lookup(&self, name: &str, id: BrokerId) -> Result<Arc<VmBroker>> {
        match self.brokers.lock().get(name) {
            Some(broker) if broker.id() == id => Ok(broker.clone()),
            Some(_) => Err(JmsError::illegal_state(format!(
                "broker {name} was replaced since the connection was opened"
            ))),
            None => Err(JmsError::illegal_state(format!(
                "broker {name} no longer exists"
            ))),
        }
    }

    /// Removes a broker and everything it holds
    pub fn remove(&self, name: &str) -> Option<Arc<VmBroker>> {
        let removed = self.brokers.lock().remove(name);
        if removed.is_some() {
            info!(broker = name, "removed broker");
        }
        removed
    }

    pub fn names(&self) -> Vec<String> {
        self.brokers.lock().keys().cloned().collect()
    }
}
