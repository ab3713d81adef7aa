//! The `client` module is the application-facing messaging API.
//!
//! A [`ConnectionFactory`] opens a [`Connection`]; a connection creates
//! [`Session`]s; a session creates messages, destinations, a
//! [`MessageProducer`] and a [`MessageConsumer`]. Everything runs on the
//! caller's thread: a send invokes the receiving listeners before it
//! returns.

pub mod acknowledge;
pub mod connection;
pub mod consumer;
pub mod factory;
pub mod metadata;
pub mod producer;
pub mod session;

pub use acknowledge::AcknowledgeMode;
pub use connection::{Connection, ConnectionState};
pub use consumer::{MessageConsumer, MessageListener};
pub use factory::ConnectionFactory;
pub use metadata::ConnectionMetaData;
pub use producer::{MessageProducer, ProducerDefaults};
pub use session::Session;
