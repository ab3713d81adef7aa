use std::sync::Arc;

use super::*;
use crate::broker::BrokerRegistry;
use crate::destination::DestinationKind;
use crate::message::{Message, MessageKind};
use crate::utils::error::JmsError;

fn vm() -> (VmProvider, Arc<BrokerRegistry>) {
    let brokers = Arc::new(BrokerRegistry::new());
    (VmProvider::new(brokers.clone()), brokers)
}

#[test]
fn test_default_registry_knows_vm() {
    let registry = ProviderRegistry::with_defaults();
    assert_eq!(registry.schemes(), vec!["vm".to_string()]);
    let (provider, url) = registry.resolve(DEFAULT_URL).unwrap();
    assert_eq!(provider.scheme(), DEFAULT_SCHEME);
    assert_eq!(url.host_str(), Some("default"));
}

#[test]
fn test_scheme_is_case_insensitive() {
    let registry = ProviderRegistry::with_defaults();
    let (provider, _) = registry.resolve("VM://Broker").unwrap();
    assert_eq!(provider.scheme(), "vm");
}

#[test]
fn test_unknown_or_missing_scheme_is_invalid_url() {
    let registry = ProviderRegistry::with_defaults();
    assert!(matches!(
        registry.resolve("tcp://localhost:61616"),
        Err(JmsError::InvalidUrl(_))
    ));
    assert!(matches!(registry.resolve("default"), Err(JmsError::InvalidUrl(_))));
    assert!(matches!(
        ProviderRegistry::new().resolve(DEFAULT_URL),
        Err(JmsError::InvalidUrl(_))
    ));
}

#[test]
fn test_connect_needs_a_broker_name() {
    let (provider, _) = vm();
    let url = url::Url::parse("vm:nobroker").unwrap();
    assert!(matches!(
        provider.connect(&url, None, None),
        Err(JmsError::InvalidUrl(_))
    ));
}

#[test]
fn test_connect_creates_the_broker() {
    let (provider, brokers) = vm();
    let url = url::Url::parse("vm://test").unwrap();
    let a = provider.connect(&url, Some("user"), Some("secret")).unwrap();
    let b = provider.connect(&url, None, None).unwrap();
    assert_eq!(a.broker_name, "test");
    assert_eq!(a.broker_id, b.broker_id);
    assert_ne!(a.connection_id, b.connection_id);
    assert_eq!(a.username.as_deref(), Some("user"));
    assert!(brokers.get("test").is_some());
}

#[test]
fn test_removed_broker_invalidates_connections() {
    let (provider, brokers) = vm();
    let ctx = provider
        .connect(&url::Url::parse("vm://test").unwrap(), None, None)
        .unwrap();
    provider.create_session(&ctx).unwrap();
    brokers.remove("test");
    assert!(matches!(
        provider.create_session(&ctx),
        Err(JmsError::IllegalState(_))
    ));
    assert!(matches!(
        provider.create_queue(&ctx, "Q"),
        Err(JmsError::IllegalState(_))
    ));
}

#[test]
fn test_close_releases_temporary_destinations() {
    let (provider, brokers) = vm();
    let ctx = provider
        .connect(&url::Url::parse("vm://test").unwrap(), None, None)
        .unwrap();
    let temp = provider
        .create_temporary_destination(&ctx, DestinationKind::Queue)
        .unwrap();
    provider.claim_client_id(&ctx, "me").unwrap();
    provider.close(&ctx).unwrap();

    let broker = brokers.get("test").unwrap();
    assert!(!broker.is_interned(&temp));
    broker.claim_client_id("me", "someone-else").unwrap();
}

#[test]
fn test_send_through_provider() {
    let (provider, _) = vm();
    let ctx = provider
        .connect(&url::Url::parse("vm://test").unwrap(), None, None)
        .unwrap();
    let topic = provider.create_topic(&ctx, "T").unwrap();
    let seen = Arc::new(parking_lot::Mutex::new(0));
    let counter = seen.clone();
    provider
        .register_consumer(
            &ctx,
            &topic,
            &"C1".to_string(),
            Arc::new(move |_m: Message| *counter.lock() += 1),
        )
        .unwrap();
    provider
        .send(&ctx, &topic, Message::new(MessageKind::Plain))
        .unwrap();
    provider
        .unregister_consumer(&ctx, &topic, &"C1".to_string())
        .unwrap();
    provider
        .send(&ctx, &topic, Message::new(MessageKind::Plain))
        .unwrap();
    assert_eq!(*seen.lock(), 1);
}
