//! The `broker` module implements the in-process `vm` broker.
//!
//! A [`BrokerRegistry`] maps names to [`VmBroker`]s. Each broker interns
//! destinations, tracks the consumers attached to them and the client ids
//! claimed by live connections, and delivers messages synchronously on the
//! sender's thread.

pub mod engine;
pub mod entry;
pub mod registry;

pub use engine::{BrokerId, VmBroker};
pub use entry::{ConnectionId, ConsumerId, Endpoint};
pub use registry::BrokerRegistry;

#[cfg(test)]
mod tests;
