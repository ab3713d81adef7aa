use std::sync::Arc;

use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

use super::{ConnectionContext, Provider};
use crate::broker::{BrokerRegistry, ConsumerId, Endpoint, VmBroker};
use crate::destination::{Destination, DestinationKind};
use crate::message::Message;
use crate::utils::error::{JmsError, Result};

/// Provider for `vm://<broker>` URLs, backed by in-process brokers.
///
/// Brokers are created on first connect. Credentials are accepted and
/// ignored.
#[derive(Debug, Default)]
pub struct VmProvider {
    brokers: Arc<BrokerRegistry>,
}

impl VmProvider {
    pub fn new(brokers: Arc<BrokerRegistry>) -> Self {
        Self { brokers }
    }

    pub fn brokers(&self) -> &Arc<BrokerRegistry> {
        &self.brokers
    }

    fn broker(&self, ctx: &ConnectionContext) -> Result<Arc<VmBroker>> {
        self.brokers.lookup(&ctx.broker_name, ctx.broker_id)
    }
}

impl Provider for VmProvider {
    fn scheme(&self) -> &str {
        "vm"
    }

    fn connect(
        &self,
        url: &Url,
        username: Option<&str>,
        _password: Option<&str>,
    ) -> Result<ConnectionContext> {
        let name = url
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| JmsError::InvalidUrl(format!("{url} does not name a broker")))?;
        let broker = self.brokers.get_or_create(name);
        let ctx = ConnectionContext {
            broker_name: broker.name().to_string(),
            broker_id: broker.id(),
            connection_id: Uuid::new_v4().to_string(),
            username: username.map(str::to_string),
        };
        info!(broker = name, connection = %ctx.connection_id, "connection opened");
        Ok(ctx)
    }

    fn close(&self, ctx: &ConnectionContext) -> Result<()> {
        self.broker(ctx)?.release_connection(&ctx.connection_id);
        info!(broker = %ctx.broker_name, connection = %ctx.connection_id, "connection closed");
        Ok(())
    }

    fn create_session(&self, ctx: &ConnectionContext) -> Result<()> {
        self.broker(ctx).map(|_| ())
    }

    fn create_queue(&self, ctx: &ConnectionContext, name: &str) -> Result<Destination> {
        self.broker(ctx)?.create_destination(name, DestinationKind::Queue)
    }

    fn create_topic(&self, ctx: &ConnectionContext, name: &str) -> Result<Destination> {
        self.broker(ctx)?.create_destination(name, DestinationKind::Topic)
    }

    fn create_temporary_destination(
        &self,
        ctx: &ConnectionContext,
        kind: DestinationKind,
    ) -> Result<Destination> {
        Ok(self.broker(ctx)?.create_temporary(kind, &ctx.connection_id))
    }

    fn delete_temporary_destination(
        &self,
        ctx: &ConnectionContext,
        destination: &Destination,
    ) -> Result<()> {
        self.broker(ctx)?.delete_temporary(destination, &ctx.connection_id)
    }

    fn register_consumer(
        &self,
        ctx: &ConnectionContext,
        destination: &Destination,
        consumer: &ConsumerId,
        endpoint: Endpoint,
    ) -> Result<()> {
        self.broker(ctx)?.register_consumer(
            destination,
            consumer,
            &ctx.connection_id,
            endpoint,
        )
    }

    fn unregister_consumer(
        &self,
        ctx: &ConnectionContext,
        destination: &Destination,
        consumer: &ConsumerId,
    ) -> Result<()> {
        self.broker(ctx)?.unregister_consumer(destination, consumer)
    }

    fn send(
        &self,
        ctx: &ConnectionContext,
        destination: &Destination,
        message: Message,
    ) -> Result<()> {
        let delivered = self.broker(ctx)?.send(destination, message)?;
        debug!(%destination, delivered, "message sent");
        Ok(())
    }

    fn claim_client_id(&self, ctx: &ConnectionContext, client_id: &str) -> Result<()> {
        self.broker(ctx)?.claim_client_id(client_id, &ctx.connection_id)
    }

    fn release_client_id(&self, ctx: &ConnectionContext, client_id: &str) -> Result<()> {
        self.broker(ctx)?.release_client_id(client_id, &ctx.connection_id);
        Ok(())
    }
}
