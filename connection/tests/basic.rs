use connection::{
    BoundedConnection, Connection, ConnectionConfig, ConnectionError, ConnectionFactory,
    ConnectionKind,
};

fn create_connection(kind: ConnectionKind, queue_capacity: usize) -> Box<dyn Connection<String>> {
    let config = ConnectionConfig {
        kind,
        queue_capacity,
    };
    ConnectionFactory::create(&config)
}

#[test]
fn config_default_is_inprocess_with_reasonable_capacity() {
    let config = ConnectionConfig::default();
    assert_eq!(config.kind, ConnectionKind::InProcess);
    assert_eq!(config.queue_capacity, 1024);
}

#[test]
fn in_process_send_recv() {
    let conn = create_connection(ConnectionKind::InProcess, 1024);
    assert!(conn.try_recv().unwrap().is_none());
    conn.send("{\"code\":\"\",\"save\":false}".to_string()).unwrap();
    assert_eq!(
        conn.try_recv().unwrap().as_deref(),
        Some("{\"code\":\"\",\"save\":false}")
    );
    assert!(conn.try_recv().unwrap().is_none());
}

#[test]
fn in_process_ignores_capacity() {
    let conn = create_connection(ConnectionKind::InProcess, 1);
    for idx in 0..10 {
        conn.send(format!("msg {idx}")).unwrap();
    }
    assert_eq!(conn.drain().unwrap().len(), 10);
}

#[test]
fn bounded_is_fifo() {
    let conn = create_connection(ConnectionKind::Bounded, 4);
    conn.send("a".into()).unwrap();
    conn.send("b".into()).unwrap();
    conn.send("c".into()).unwrap();
    assert_eq!(conn.drain().unwrap(), vec!["a", "b", "c"]);
    assert!(conn.try_recv().unwrap().is_none());
}

#[test]
fn bounded_respects_capacity() {
    let conn = create_connection(ConnectionKind::Bounded, 1);
    conn.send("first".into()).unwrap();
    assert_eq!(
        conn.send("second".into()),
        Err(ConnectionError::QueueFull(1))
    );
    assert_eq!(conn.try_recv().unwrap().as_deref(), Some("first"));
    conn.send("third".into()).unwrap();
}

#[test]
fn bounded_clamps_zero_capacity_to_one() {
    let conn = BoundedConnection::<u32>::new(0);
    assert_eq!(conn.capacity(), 1);
    conn.send(10).unwrap();
    assert!(conn.send(11).is_err());
    assert_eq!(conn.try_recv().unwrap(), Some(10));
}

#[test]
fn drain_on_empty_queue_is_empty() {
    let conn = create_connection(ConnectionKind::InProcess, 8);
    assert!(conn.drain().unwrap().is_empty());
}
