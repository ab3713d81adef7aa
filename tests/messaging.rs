use std::sync::Arc;

use minijms::broker::{BrokerRegistry, Endpoint};
use minijms::message::Body;
use minijms::{
    AcknowledgeMode, ConnectionFactory, Destination, DestinationKind, JmsError, Message,
    MessageKind, ProviderRegistry,
};
use parking_lot::Mutex;

fn factory(url: &str) -> ConnectionFactory {
    ConnectionFactory::with_url(Arc::new(ProviderRegistry::with_defaults()), url).unwrap()
}

#[test]
fn test_queue_consumer_receives_message_exactly_once() {
    let connection = factory("vm://test").create_connection().unwrap();
    assert_eq!(connection.broker_name(), "test");
    let session = connection
        .create_session(false, AcknowledgeMode::AutoAcknowledge)
        .unwrap();
    let queue = session.create_queue("Q").unwrap();

    let c1 = session.create_consumer(Some(&queue)).unwrap();
    let received = Arc::new(Mutex::new(Vec::<Message>::new()));
    let sink = received.clone();
    c1.set_message_listener(Some(Arc::new(move |m: Message| sink.lock().push(m))))
        .unwrap();

    let mut m = session.create_text_message(Some("M")).unwrap();
    m.properties_mut().set_int("seq", 1).unwrap();
    session
        .create_producer(Some(&queue))
        .unwrap()
        .send(&mut m)
        .unwrap();

    let received = received.lock();
    assert_eq!(received.len(), 1);
    let got = &received[0];
    assert_eq!(got.header().message_id(), m.header().message_id());
    assert_eq!(got.as_text().unwrap().text(), Some("M"));
    assert_eq!(got.properties().get_int("seq").unwrap(), 1);
    assert_eq!(got.header().destination(), Some(&queue));
}

#[test]
fn test_transacted_session_reports_session_transacted() {
    let connection = factory("vm://test").create_connection().unwrap();
    let session = connection
        .create_session(true, AcknowledgeMode::AutoAcknowledge)
        .unwrap();
    assert_eq!(session.acknowledge_mode(), AcknowledgeMode::SessionTransacted);
    assert!(session.transacted());
}

#[test]
fn test_session_transacted_mode_requires_transaction() {
    let connection = factory("vm://test").create_connection().unwrap();
    assert!(
        connection
            .create_session(false, AcknowledgeMode::SessionTransacted)
            .is_err()
    );
}

#[test]
fn test_map_values_read_back_as_int() {
    let mut message = Message::new(MessageKind::Map);
    {
        let map = message.as_map_mut().unwrap();
        map.set_int("a", 1).unwrap();
        map.set_byte("b", 2).unwrap();
        map.set_short("c", 3).unwrap();
        map.set_string("d", Some("4")).unwrap();
    }

    let encoded = message.body().encode().unwrap();
    let Body::Map(decoded) = Body::decode(MessageKind::Map, encoded.as_deref()).unwrap() else {
        panic!("expected a map body");
    };
    let values: Vec<i32> = ["a", "b", "c", "d"]
        .iter()
        .map(|key| decoded.get_int(key).unwrap())
        .collect();
    assert_eq!(values, vec![1, 2, 3, 4]);
    assert!(decoded.is_read_only());
}

#[test]
fn test_map_values_survive_delivery() {
    let connection = factory("vm://test").create_connection().unwrap();
    let session = connection
        .create_session(false, AcknowledgeMode::AutoAcknowledge)
        .unwrap();
    let topic = session.create_topic("T").unwrap();
    let consumer = session.create_consumer(Some(&topic)).unwrap();

    let mut message = session.create_map_message().unwrap();
    {
        let map = message.as_map_mut().unwrap();
        map.set_int("a", 1).unwrap();
        map.set_byte("b", 2).unwrap();
        map.set_short("c", 3).unwrap();
        map.set_string("d", Some("4")).unwrap();
    }
    session
        .create_producer(Some(&topic))
        .unwrap()
        .send(&mut message)
        .unwrap();

    let received = consumer.receive_no_wait().unwrap().unwrap();
    let map = received.as_map().unwrap();
    for (key, expected) in [("a", 1), ("b", 2), ("c", 3), ("d", 4)] {
        assert_eq!(map.get_int(key).unwrap(), expected);
    }
}

#[test]
fn test_client_id_can_only_be_set_once() {
    let factory = factory("vm://test");
    let first = factory.create_connection().unwrap();
    first.set_client_id("x").unwrap();
    assert!(matches!(
        first.set_client_id("y"),
        Err(JmsError::IllegalState(_))
    ));

    let fresh = factory.create_connection().unwrap();
    fresh.set_client_id("y").unwrap();
    assert_eq!(fresh.client_id().unwrap().as_deref(), Some("y"));
}

#[test]
fn test_broker_rejects_duplicate_registration_and_uninterned_sends() {
    let registry = BrokerRegistry::new();
    let broker = registry.get_or_create("test");
    let queue = broker
        .create_destination("Q", DestinationKind::Queue)
        .unwrap();
    let endpoint: Endpoint = Arc::new(|_: Message| {});

    broker
        .register_consumer(&queue, "C1", "conn", endpoint.clone())
        .unwrap();
    assert!(
        broker
            .register_consumer(&queue, "C1", "conn", endpoint)
            .is_err()
    );

    assert!(matches!(
        broker.send(&Destination::queue("nowhere"), Message::default()),
        Err(JmsError::InvalidDestination(_))
    ));
    assert!(matches!(
        broker.send(&Destination::topic("Q"), Message::default()),
        Err(JmsError::InvalidDestination(_))
    ));
    assert_eq!(broker.send(&queue, Message::default()).unwrap(), 1);
}

#[test]
fn test_brokers_are_isolated_by_name() {
    let registry = Arc::new(ProviderRegistry::with_defaults());
    let a = ConnectionFactory::with_url(registry.clone(), "vm://alpha")
        .unwrap()
        .create_connection()
        .unwrap();
    let b = ConnectionFactory::with_url(registry, "vm://beta")
        .unwrap()
        .create_connection()
        .unwrap();
    a.set_client_id("same").unwrap();
    b.set_client_id("same").unwrap();

    let a_session = a
        .create_session(false, AcknowledgeMode::AutoAcknowledge)
        .unwrap();
    let b_session = b
        .create_session(false, AcknowledgeMode::AutoAcknowledge)
        .unwrap();
    let queue = a_session.create_queue("Q").unwrap();
    let producer = b_session.create_producer(Some(&queue)).unwrap();
    assert!(matches!(
        producer.send(&mut b_session.create_message().unwrap()),
        Err(JmsError::InvalidDestination(_))
    ));
}
