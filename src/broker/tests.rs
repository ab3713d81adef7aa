use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use parking_lot::Mutex;

use super::*;
use crate::destination::{Destination, DestinationKind};
use crate::message::{Message, MessageKind};
use crate::utils::error::JmsError;

fn recorder() -> (Endpoint, Arc<Mutex<Vec<Message>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let endpoint: Endpoint = Arc::new(move |m: Message| sink.lock().push(m));
    (endpoint, seen)
}

fn text(body: &str) -> Message {
    Message::text(Some(body)).unwrap().delivery_copy().unwrap()
}

#[test]
fn test_create_destination_interns() {
    let broker = VmBroker::new("test");
    let a = broker.create_destination("Q", DestinationKind::Queue).unwrap();
    let b = broker.create_destination("Q", DestinationKind::Queue).unwrap();
    assert_eq!(a, b);
    assert!(broker.is_interned(&a));
    assert!(!broker.is_interned(&Destination::topic("Q")));
}

#[test]
fn test_create_destination_ignores_case() {
    let broker = VmBroker::new("test");
    let upper = broker.create_destination("Orders", DestinationKind::Queue).unwrap();
    let lower = broker.create_destination("orders", DestinationKind::Queue).unwrap();
    assert_eq!(upper, lower);
    assert_eq!(lower.name(), "Orders");

    let topic = broker.create_destination("ORDERS", DestinationKind::Topic).unwrap();
    assert_eq!(topic.name(), "ORDERS");
    assert_ne!(topic, upper);
}

#[test]
fn test_empty_destination_name_is_rejected() {
    let broker = VmBroker::new("test");
    assert!(matches!(
        broker.create_destination("", DestinationKind::Topic),
        Err(JmsError::InvalidDestination(_))
    ));
}

#[test]
fn test_send_delivers_once_per_consumer() {
    let broker = VmBroker::new("test");
    let queue = broker.create_destination("Q", DestinationKind::Queue).unwrap();
    let (endpoint, seen) = recorder();
    broker.register_consumer(&queue, "C1", "conn", endpoint).unwrap();

    assert_eq!(broker.send(&queue, text("M")).unwrap(), 1);
    let seen = seen.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].as_text().unwrap().text(), Some("M"));
}

#[test]
fn test_send_fans_out_in_registration_order() {
    let broker = VmBroker::new("test");
    let topic = broker.create_destination("T", DestinationKind::Topic).unwrap();
    let order = Arc::new(Mutex::new(Vec::new()));
    for name in ["first", "second", "third"] {
        let order = order.clone();
        broker
            .register_consumer(
                &topic,
                name,
                "conn",
                Arc::new(move |_m: Message| order.lock().push(name)),
            )
            .unwrap();
    }
    broker.send(&topic, Message::new(MessageKind::Plain)).unwrap();
    assert_eq!(*order.lock(), vec!["first", "second", "third"]);
}

#[test]
fn test_duplicate_registration_fails() {
    let broker = VmBroker::new("test");
    let queue = broker.create_destination("Q", DestinationKind::Queue).unwrap();
    let (endpoint, _) = recorder();
    broker
        .register_consumer(&queue, "C1", "conn", endpoint.clone())
        .unwrap();
    assert!(matches!(
        broker.register_consumer(&queue, "C1", "conn", endpoint),
        Err(JmsError::IllegalState(_))
    ));
    assert_eq!(broker.consumer_count(&queue), 1);
}

#[test]
fn test_unregister_stops_delivery() {
    let broker = VmBroker::new("test");
    let queue = broker.create_destination("Q", DestinationKind::Queue).unwrap();
    let (endpoint, seen) = recorder();
    broker.register_consumer(&queue, "C1", "conn", endpoint).unwrap();
    broker.unregister_consumer(&queue, "C1").unwrap();
    broker.unregister_consumer(&queue, "C1").unwrap();
    assert_eq!(broker.send(&queue, text("M")).unwrap(), 0);
    assert!(seen.lock().is_empty());
}

#[test]
fn test_send_to_uninterned_destination_fails() {
    let broker = VmBroker::new("test");
    assert!(matches!(
        broker.send(&Destination::queue("nowhere"), text("M")),
        Err(JmsError::InvalidDestination(_))
    ));
    let (endpoint, _) = recorder();
    assert!(matches!(
        broker.register_consumer(&Destination::queue("nowhere"), "C1", "conn", endpoint),
        Err(JmsError::InvalidDestination(_))
    ));
}

#[test]
fn test_endpoint_may_send_during_delivery() {
    let broker = Arc::new(VmBroker::new("test"));
    let ping = broker.create_destination("ping", DestinationKind::Topic).unwrap();
    let pong = broker.create_destination("pong", DestinationKind::Topic).unwrap();
    let (endpoint, seen) = recorder();
    broker.register_consumer(&pong, "P", "conn", endpoint).unwrap();

    let relay = broker.clone();
    let target = pong.clone();
    broker
        .register_consumer(
            &ping,
            "R",
            "conn",
            Arc::new(move |m: Message| {
                relay.send(&target, m).unwrap();
            }),
        )
        .unwrap();

    broker.send(&ping, text("hi")).unwrap();
    assert_eq!(seen.lock().len(), 1);
}

#[test]
fn test_temporary_destination_is_owned() {
    let broker = VmBroker::new("test");
    let temp = broker.create_temporary(DestinationKind::Queue, "owner");
    assert!(temp.is_temporary());
    let (endpoint, _) = recorder();
    assert!(matches!(
        broker.register_consumer(&temp, "C1", "intruder", endpoint.clone()),
        Err(JmsError::IllegalState(_))
    ));
    broker.register_consumer(&temp, "C1", "owner", endpoint).unwrap();

    assert!(matches!(
        broker.delete_temporary(&temp, "owner"),
        Err(JmsError::IllegalState(_))
    ));
    broker.unregister_consumer(&temp, "C1").unwrap();
    assert!(matches!(
        broker.delete_temporary(&temp, "intruder"),
        Err(JmsError::IllegalState(_))
    ));
    broker.delete_temporary(&temp, "owner").unwrap();
    assert!(matches!(
        broker.delete_temporary(&temp, "owner"),
        Err(JmsError::InvalidDestination(_))
    ));
}

#[test]
fn test_client_ids_are_unique_per_broker() {
    let broker = VmBroker::new("test");
    broker.claim_client_id("alice", "c1").unwrap();
    broker.claim_client_id("alice", "c1").unwrap();
    assert!(matches!(
        broker.claim_client_id("alice", "c2"),
        Err(JmsError::InvalidClientId(_))
    ));
    assert!(matches!(
        broker.claim_client_id("", "c2"),
        Err(JmsError::InvalidClientId(_))
    ));
    broker.release_client_id("alice", "c2");
    assert!(broker.claim_client_id("alice", "c2").is_err());
    broker.release_client_id("alice", "c1");
    broker.claim_client_id("alice", "c2").unwrap();
}

#[test]
fn test_release_connection_drops_its_state() {
    let broker = VmBroker::new("test");
    let queue = broker.create_destination("Q", DestinationKind::Queue).unwrap();
    let temp = broker.create_temporary(DestinationKind::Topic, "c1");
    let other = broker.create_temporary(DestinationKind::Topic, "c2");
    broker.claim_client_id("alice", "c1").unwrap();

    broker.release_connection("c1");
    assert!(!broker.is_interned(&temp));
    assert!(broker.is_interned(&other));
    assert!(broker.is_interned(&queue));
    broker.claim_client_id("alice", "c2").unwrap();
}

#[test]
fn test_registry_get_or_create_and_lookup() {
    let registry = BrokerRegistry::new();
    let broker = registry.get_or_create("test");
    assert!(Arc::ptr_eq(&broker, &registry.get_or_create("test")));
    assert!(registry.lookup("test", broker.id()).is_ok());
    assert!(matches!(
        registry.lookup("test", BrokerId::new()),
        Err(JmsError::IllegalState(_))
    ));
}

#[test]
fn test_registry_lookup_after_remove_fails() {
    let registry = BrokerRegistry::new();
    let id = registry.get_or_create("test").id();
    assert!(registry.remove("test").is_some());
    assert!(registry.remove("test").is_none());
    assert!(matches!(
        registry.lookup("test", id),
        Err(JmsError::IllegalState(_))
    ));
    let recreated = registry.get_or_create("test");
    assert_ne!(recreated.id(), id);
    assert!(registry.lookup("test", id).is_err());
    assert_eq!(registry.names(), vec!["test".to_string()]);
}

#[test]
fn test_concurrent_interning_yields_one_destination() {
    let broker = VmBroker::new("test");
    let spellings = ["shared", "Shared", "SHARED", "sHaReD"];
    let interned: Vec<Destination> = thread::scope(|s| {
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let broker = &broker;
                s.spawn(move || {
                    broker
                        .create_destination(spellings[i % spellings.len()], DestinationKind::Topic)
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(interned.windows(2).all(|pair| pair[0] == pair[1]));
    assert!(broker.is_interned(&interned[0]));
}

#[test]
fn test_registration_racing_delivery_counts_every_message_once() {
    let broker = VmBroker::new("test");
    let queue = broker.create_destination("Q", DestinationKind::Queue).unwrap();
    let counters: Vec<Arc<AtomicUsize>> = (0..8).map(|_| Arc::new(AtomicUsize::new(0))).collect();
    let reported = AtomicUsize::new(0);

    thread::scope(|s| {
        for (i, counter) in counters.iter().enumerate() {
            let (broker, queue, counter) = (&broker, &queue, counter.clone());
            s.spawn(move || {
                let endpoint: Endpoint = Arc::new(move |_: Message| {
                    counter.fetch_add(1, Ordering::SeqCst);
                });
                broker
                    .register_consumer(queue, &format!("c{i}"), "conn", endpoint)
                    .unwrap();
            });
        }
        for _ in 0..4 {
            let (broker, queue, reported) = (&broker, &queue, &reported);
            s.spawn(move || {
                for _ in 0..50 {
                    let delivered = broker.send(queue, Message::default()).unwrap();
                    reported.fetch_add(delivered, Ordering::SeqCst);
                }
            });
        }
    });

    // whatever a send saw, each consumer it reported was invoked exactly once
    let received: usize = counters.iter().map(|c| c.load(Ordering::SeqCst)).sum();
    assert_eq!(received, reported.load(Ordering::SeqCst));
    assert_eq!(broker.consumer_count(&queue), 8);

    let before: Vec<usize> = counters.iter().map(|c| c.load(Ordering::SeqCst)).collect();
    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..25 {
                    assert_eq!(broker.send(&queue, Message::default()).unwrap(), 8);
                }
            });
        }
    });
    for (counter, start) in counters.iter().zip(before) {
        assert_eq!(counter.load(Ordering::SeqCst) - start, 100);
    }
}

#[test]
fn test_concurrent_unregister_and_send() {
    let broker = VmBroker::new("test");
    let queue = broker.create_destination("Q", DestinationKind::Queue).unwrap();
    for i in 0..32 {
        let endpoint: Endpoint = Arc::new(|_: Message| {});
        broker
            .register_consumer(&queue, &format!("c{i}"), "conn", endpoint)
            .unwrap();
    }

    thread::scope(|s| {
        s.spawn(|| {
            for i in 0..32 {
                broker.unregister_consumer(&queue, &format!("c{i}")).unwrap();
            }
        });
        s.spawn(|| {
            let mut last = usize::MAX;
            for _ in 0..200 {
                let delivered = broker.send(&queue, Message::default()).unwrap();
                assert!(delivered <= last);
                last = delivered;
            }
        });
    });
    assert_eq!(broker.consumer_count(&queue), 0);
}
