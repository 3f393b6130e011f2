use super::*;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use relay_config::Protocol;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::{TcpListener, UdpSocket};
use tokio::time::timeout;

fn udp_config(addr: SocketAddr) -> ForwarderConfig {
    ForwarderConfig {
        host: addr.ip().to_string(),
        port: addr.port(),
        protocol: Protocol::Udp,
        reconnect_interval: 0.05,
        ..Default::default()
    }
}

async fn recv_payload(server: &UdpSocket) -> Value {
    let mut buf = [0u8; 4096];
    let (len, _) = timeout(Duration::from_secs(5), server.recv_from(&mut buf))
        .await
        .expect("payload should arrive")
        .expect("recv");
    serde_json::from_slice(&buf[..len]).expect("payload is JSON")
}

#[tokio::test]
async fn test_deliver_builds_normalized_payload() {
    let server = UdpSocket::bind("127.0.0.1:0").await.expect("bind");
    let addr = server.local_addr().expect("addr");

    let mut config = udp_config(addr);
    config.static_fields = HashMap::from([("ttl".to_string(), "60".to_string())]);
    config.map_fields = true;

    let mut forwarder = Forwarder::connect(&config).await;

    let record = json!({
        "@timestamp": 1386686186,
        "host": "web-1",
        "service": "api",
        "message": "disk full",
        "value": 0.93,
        "tags": ["disk", "prod"],
        "nested": {"key": "value"}
    });
    forwarder.deliver(&record).await;

    let payload = recv_payload(&server).await;
    assert_eq!(payload["host"], json!("web-1"));
    assert_eq!(payload["service"], json!("api"));
    assert_eq!(payload["time"], json!(1386686186000_i64));
    assert_eq!(payload["description"], json!("disk full"));
    assert_eq!(payload["metric"], json!(0.93));
    assert_eq!(payload["ttl"], json!(60.0));
    assert_eq!(payload["tags"], json!(["disk", "prod"]));
    assert_eq!(payload["nested.key"], json!("value"));
    assert_eq!(payload["meta"], record);
}

#[tokio::test]
async fn test_gate_skips_rejected_records() {
    let server = UdpSocket::bind("127.0.0.1:0").await.expect("bind");
    let addr = server.local_addr().expect("addr");

    let mut forwarder = Forwarder::connect(&udp_config(addr))
        .await
        .with_gate(|record| record.get("level") == Some(&json!("critical")));

    forwarder.deliver(&json!({"level": "info", "message": "ignored"})).await;
    forwarder
        .deliver(&json!({"level": "critical", "message": "kept"}))
        .await;

    // Only the record that passed the gate arrives
    let payload = recv_payload(&server).await;
    assert_eq!(payload["description"], json!("kept"));

    let snapshot = forwarder.snapshot();
    assert_eq!(snapshot.events_received, 1);
    assert_eq!(snapshot.events_rejected, 1);
    assert_eq!(snapshot.events_sent, 1);
    assert_eq!(snapshot.events_dropped, 0);
}

#[tokio::test]
async fn test_metrics_track_sent_bytes() {
    let server = UdpSocket::bind("127.0.0.1:0").await.expect("bind");
    let addr = server.local_addr().expect("addr");

    let mut forwarder = Forwarder::connect(&udp_config(addr)).await;
    forwarder.deliver(&json!({"message": "one"})).await;
    forwarder.deliver(&json!({"message": "two"})).await;

    let first = recv_payload(&server).await;
    assert_eq!(first["description"], json!("one"));

    let snapshot = forwarder.snapshot();
    assert_eq!(snapshot.events_received, 2);
    assert_eq!(snapshot.events_sent, 2);
    assert!(snapshot.bytes_sent > 0);
    assert_eq!(snapshot.reconnects, 0);
}

#[tokio::test]
async fn test_deliver_over_tcp_writes_one_line_per_event() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let mut lines = BufReader::new(stream).lines();
        let first = lines.next_line().await.expect("line").expect("some");
        let second = lines.next_line().await.expect("line").expect("some");
        (first, second)
    });

    let config = ForwarderConfig {
        host: addr.ip().to_string(),
        port: addr.port(),
        protocol: Protocol::Tcp,
        reconnect_interval: 0.05,
        ..Default::default()
    };
    let mut forwarder = Forwarder::connect(&config).await;

    forwarder.deliver(&json!({"message": "first"})).await;
    forwarder.deliver(&json!({"message": "second"})).await;

    let (first, second) = server.await.expect("server task");
    let first: Value = serde_json::from_str(&first).expect("json");
    let second: Value = serde_json::from_str(&second).expect("json");
    assert_eq!(first["description"], json!("first"));
    assert_eq!(second["description"], json!("second"));
}

#[tokio::test]
async fn test_debug_flag_logs_without_altering_payload() {
    let server = UdpSocket::bind("127.0.0.1:0").await.expect("bind");
    let addr = server.local_addr().expect("addr");

    let mut config = udp_config(addr);
    config.debug = true;
    let mut forwarder = Forwarder::connect(&config).await;

    forwarder.deliver(&json!({"message": "hi"})).await;
    let payload = recv_payload(&server).await;
    assert_eq!(payload["description"], json!("hi"));
}
