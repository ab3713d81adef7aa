//! Pluggable messaging providers.
//!
//! A [`Provider`] is the seam between the client API and a broker. The
//! [`ProviderRegistry`] picks one by URL scheme; `vm` (the in-process
//! broker) is the only scheme registered by default.

pub mod registry;
pub mod vm;

pub use registry::{DEFAULT_SCHEME, DEFAULT_URL, ProviderRegistry};
pub use vm::VmProvider;

use url::Url;

use crate::broker::{BrokerId, ConnectionId, ConsumerId, Endpoint};
use crate::destination::{Destination, DestinationKind};
use crate::message::Message;
use crate::utils::error::Result;

#[cfg(test)]
mod tests;

/// What a provider hands back for an open connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionContext {
    pub broker_name: String,
    pub broker_id: BrokerId,
    pub connection_id: ConnectionId,
    pub username: Option<String>,
}

/// Operations the client layer needs from a broker.
pub trait Provider: Send + Sync {
    /// Scheme this provider answers to, lowercase.
    fn scheme(&self) -> &str;

    fn connect(
        &self,
        url: &Url,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<ConnectionContext>;

    /// Releases everything the connection holds on the broker.
    fn close(&self, ctx: &ConnectionContext) -> Result<()>;

    /// Checks that the connection's broker is still there.
    fn create_session(&self, ctx: &ConnectionContext) -> Result<()>;

    fn create_queue(&self, ctx: &ConnectionContext, name: &str) -> Result<Destination>;

    fn create_topic(&self, ctx: &ConnectionContext, name: &str) -> Result<Destination>;

    fn create_temporary_destination(
        &self,
        ctx: &ConnectionContext,
        kind: DestinationKind,
    ) -> Result<Destination>;

    fn delete_temporary_destination(
        &self,
        ctx: &ConnectionContext,
        destination: &Destination,
    ) -> Result<()>;

    fn register_consumer(
        &self,
        ctx: &ConnectionContext,
        destination: &Destination,
        consumer: &ConsumerId,
        endpoint: Endpoint,
    ) -> Result<()>;

    fn unregister_consumer(
        &self,
        ctx: &ConnectionContext,
        destination: &Destination,
        consumer: &ConsumerId,
    ) -> Result<()>;

    /// Delivers an already frozen message to the destination's consumers.
    fn send(&self, ctx: &ConnectionContext, destination: &Destination, message: Message)
    -> Result<()>;

    fn claim_client_id(&self, ctx: &ConnectionContext, client_id: &str) -> Result<()>;

    fn release_client_id(&self, ctx: &ConnectionContext, client_id: &str) -> Result<()>;
}
