//! # minijms
//!
//! `minijms` is an in-process, JMS-style messaging client and provider.
//! Producers and consumers talk through a named broker that lives inside
//! the same process; delivery is synchronous, on the sender's thread.
//!
//! ## Core Modules
//!
//! - `message`: The message envelope (header, properties, typed body) and the
//!   type-coercion rules between stored values and requested types.
//! - `wire`: The binary codec used by map and stream bodies.
//! - `destination`: Queue and topic identities.
//! - `broker`: The `vm` broker: destination interning, consumer registration
//!   and fan-out, client-id bookkeeping, plus the process-wide broker registry.
//! - `provider`: The provider abstraction and the URL-scheme registry that
//!   selects one; ships the `vm` provider.
//! - `client`: Connection factory, connections, sessions, producers and
//!   consumers.
//! - `config`: Loading settings from a file and the environment.
//! - `utils`: Error type and logging setup.
//!
//! ```no_run
//! use std::sync::Arc;
//! use minijms::{AcknowledgeMode, ConnectionFactory, ProviderRegistry};
//!
//! # fn main() -> minijms::Result<()> {
//! let factory = ConnectionFactory::with_url(Arc::new(ProviderRegistry::with_defaults()), "vm://demo")?;
//! let connection = factory.create_connection()?;
//! let session = connection.create_session(false, AcknowledgeMode::AutoAcknowledge)?;
//! let queue = session.create_queue("orders")?;
//! let consumer = session.create_consumer(Some(&queue))?;
//! session
//!     .create_producer(Some(&queue))?
//!     .send(&mut session.create_text_message(Some("hello"))?)?;
//! assert!(consumer.receive_no_wait()?.is_some());
//! connection.close()?;
//! # Ok(())
//! # }
//! ```

pub mod broker;
pub mod client;
pub mod config;
pub mod destination;
pub mod message;
pub mod provider;
pub mod utils;
pub mod wire;

pub use client::{
    AcknowledgeMode, Connection, ConnectionFactory, ConnectionMetaData, ConnectionState,
    MessageConsumer, MessageListener, MessageProducer, ProducerDefaults, Session,
};
pub use destination::{Destination, DestinationKind};
pub use message::{DeliveryMode, Message, MessageKind};
pub use provider::{Provider, ProviderRegistry};
pub use utils::error::{JmsError, Result};
