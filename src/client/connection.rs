use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use crate::client::acknowledge::AcknowledgeMode;
use crate::client::metadata::ConnectionMetaData;
use crate::client::producer::ProducerDefaults;
use crate::client::session::{Session, SessionInner};
use crate::config::SessionSettings;
use crate::provider::{ConnectionContext, Provider};
use crate::utils::error::{JmsError, Result};

/// Lifecycle of a connection: `Unstarted → Started ⇄ Stopped → Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Unstarted,
    Started,
    Stopped,
    Closed,
}

pub(crate) struct ConnectionInner {
    pub(crate) provider: Arc<dyn Provider>,
    pub(crate) ctx: ConnectionContext,
    pub(crate) producer_defaults: ProducerDefaults,
    state: Mutex<ConnectionState>,
    client_id: RwLock<Option<String>>,
    sessions: Mutex<HashMap<String, Weak<SessionInner>>>,
}

impl ConnectionInner {
    pub(crate) fn ensure_open(&self) -> Result<()> {
        if *self.state.lock() == ConnectionState::Closed {
            return Err(JmsError::illegal_state("connection is closed"));
        }
        Ok(())
    }

    pub(crate) fn forget_session(&self, id: &str) {
        self.sessions.lock().remove(id);
    }
}

/// An open link to a broker
/// Owns at most one client id and the sessions created from it; cloning yields another
/// handle to the same connection
#[derive(Clone)]
pub struct Connection {
    inner: Arc<ConnectionInner>,
}

impl Connection {
    pub(crate) fn open(
        provider: Arc<dyn Provider>,
        url: &Url,
        username: Option<&str>,
        password: Option<&str>,
        client_id: Option<&str>,
        producer_defaults: ProducerDefaults,
    ) -> Result<Self> {
        let ctx = provider.connect(url, username, password)?;
        let connection = Self {
            inner: Arc::new(ConnectionInner {
                provider,
                ctx,
                producer_defaults,
                state: Mutex::new(ConnectionState::Unstarted),
                client_id: RwLock::new(None),
                sessions: Mutex::new(HashMap::new()),
            }),
        };
        if let Some(id) = client_id {
            if let Err(err) = connection.set_client_id(id) {
                // close logs its own failure; the claim error is the one to report
                let _ = connection.close();
                return Err(err);
            }
        }
        Ok(connection)
    }

    /// Provider-assigned id of this connection.
    pub fn id(&self) -> &str {
        &self.inner.ctx.connection_id
    }

    pub fn broker_name(&self) -> &str {
        &self.inner.ctx.broker_name
    }

    pub fn state(&self) -> ConnectionState {
        *self.inner.state.lock()
    }

    pub fn is_closed(&self) -> bool {
        self.state() == ConnectionState::Closed
    }

    /// True between `start` and `stop`. Delivery does not depend on it.
    pub fn is_running(&self) -> bool {
        self.state() == ConnectionState::Started
    }

    pub fn start(&self) -> Result<()> {
        self.transition(ConnectionState::Started)
    }

    pub fn stop(&self) -> Result<()> {
        self.transition(ConnectionState::Stopped)
    }

    fn transition(&self, to: ConnectionState) -> Result<()> {
        let mut state = self.inner.state.lock();
        if *state == ConnectionState::Closed {
            return Err(JmsError::illegal_state("connection is closed"));
        }
        debug!(connection = %self.id(), from = ?*state, to = ?to, "connection state change");
        *state = to;
        Ok(())
    }

    pub fn client_id(&self) -> Result<Option<String>> {
        self.inner.ensure_open()?;
        Ok(self.inner.client_id.read().clone())
    }

    /// Assigns the client id. This can happen once per connection, and the id must not be
    /// in use by another live connection on the same broker.
    ///
    /// # Errors
    ///
    /// `IllegalState` when the connection is closed or already has an id,
    /// `InvalidClientId` when the id is empty or taken.
    pub fn set_client_id(&self, client_id: &str) -> Result<()> {
        self.inner.ensure_open()?;
        let mut current = self.inner.client_id.write();
        if let Some(existing) = current.as_deref() {
            return Err(JmsError::illegal_state(format!(
                "client id is already set to {existing:?}"
            )));
        }
        if client_id.is_empty() {
            return Err(JmsError::InvalidClientId(
                "client id must not be empty".to_string(),
            ));
        }
        self.inner
            .provider
            .claim_client_id(&self.inner.ctx, client_id)?;
        *current = Some(client_id.to_string());
        Ok(())
    }

    pub fn metadata(&self) -> Result<ConnectionMetaData> {
        self.inner.ensure_open()?;
        Ok(ConnectionMetaData)
    }

    /// Creates a session.
    ///
    /// A transacted session always uses [`AcknowledgeMode::SessionTransacted`];
    /// asking for that mode without a transaction is an `IllegalState`.
    pub fn create_session(&self, transacted: bool, mode: AcknowledgeMode) -> Result<Session> {
        self.inner.ensure_open()?;
        let mode = if transacted {
            AcknowledgeMode::SessionTransacted
        } else if mode == AcknowledgeMode::SessionTransacted {
            return Err(JmsError::illegal_state(
                "session_transacted requires a transacted session",
            ));
        } else {
            mode
        };
        self.inner.provider.create_session(&self.inner.ctx)?;
        let id = Uuid::new_v4().to_string();
        let session = Session::new(id.clone(), self.inner.clone(), transacted, mode);
        self.inner
            .sessions
            .lock()
            .insert(id, Arc::downgrade(session.inner()));
        Ok(session)
    }

    /// Creates a session with the transacted flag and acknowledge mode from configuration.
    pub fn create_session_from(&self, settings: &SessionSettings) -> Result<Session> {
        let mode = settings.acknowledge_mode.parse::<AcknowledgeMode>()?;
        self.create_session(settings.transacted, mode)
    }

    pub fn session_count(&self) -> usize {
        self.inner
            .sessions
            .lock()
            .values()
            .filter(|s| s.strong_count() > 0)
            .count()
    }

    /// Closes every session, then releases the connection's broker state
    /// (client id, temporary destinations). Closing a closed connection
    /// does nothing.
    pub fn close(&self) -> Result<()> {
        {
            let mut state = self.inner.state.lock();
            if *state == ConnectionState::Closed {
                return Ok(());
            }
            *state = ConnectionState::Closed;
        }
        let sessions: Vec<Arc<SessionInner>> = self
            .inner
            .sessions
            .lock()
            .drain()
            .filter_map(|(_, session)| session.upgrade())
            .collect();
        for session in sessions {
            session.shutdown();
        }
        self.inner.client_id.write().take();
        if let Err(err) = self.inner.provider.close(&self.inner.ctx) {
            warn!(connection = %self.id(), error = %err, "broker release failed on close");
            return Err(err);
        }
        info!(connection = %self.id(), "connection closed");
        Ok(())
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id())
            .field("broker", &self.broker_name())
            .field("state", &self.state())
            .finish()
    }
}
