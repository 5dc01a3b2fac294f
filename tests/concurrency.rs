#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Concurrent-connection tests: simultaneous exchanges must be fully
//! independent, with no cross-talk between handlers.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::Framed;

use signpost::config::Snapshot;
use signpost::core::codec::PacketCodec;
use signpost::core::packet::Packet;
use signpost::protocol::dispatcher::ids;
use signpost::protocol::handshake::Handshake;
use signpost::transport::Server;

const STATUS_JSON: &str = r#"{"description":{"text":"busy"},"players":{"online":0,"max":20},"version":{"name":"test","protocol":765}}"#;
const KICK_JSON: &str = r#"{"text":"full up"}"#;

fn handshake_packet(next_state: u32) -> Packet {
    let handshake = Handshake {
        protocol_version: 765,
        server_address: "localhost".to_string(),
        server_port: 25565,
        next_state,
    };
    Packet::new(ids::HANDSHAKE, handshake.to_payload())
}

#[tokio::test]
async fn concurrent_connections_get_independent_responses() {
    let snapshot = Snapshot::new(0, STATUS_JSON.to_string(), KICK_JSON.to_string())
        .with_shutdown_timeout(Duration::from_millis(500));
    let server = Server::bind(snapshot).await.unwrap();
    let addr = server.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
    let server_handle = tokio::spawn(server.run_with_shutdown(shutdown_rx));

    let mut tasks = vec![];
    for i in 0..32u8 {
        let task = tokio::spawn(async move {
            let stream = TcpStream::connect(addr).await.expect("connect");
            let mut conn = Framed::new(stream, PacketCodec);

            // status exchange, identical for everyone
            conn.send(handshake_packet(1)).await.expect("send handshake");
            let reply = conn.next().await.unwrap().expect("status reply");
            assert_eq!(reply.id, ids::STATUS_RESPONSE);
            assert_eq!(reply.string_payload().unwrap(), STATUS_JSON);

            // echo canary unique to this connection
            let canary = vec![i, i.wrapping_add(1), 0xC0, i];
            conn.send(Packet::new(ids::LATENCY, canary.clone()))
                .await
                .expect("send canary");
            let echo = conn.next().await.unwrap().expect("echo reply");
            assert_eq!(echo.id, ids::LATENCY);
            assert_eq!(echo.payload, canary, "connection {i} got someone else's echo");
        });
        tasks.push(task);
    }

    for task in tasks {
        task.await.expect("task should complete");
    }

    let _ = shutdown_tx.send(()).await;
    server_handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn kicked_connections_do_not_disturb_status_probes() {
    let snapshot = Snapshot::new(0, STATUS_JSON.to_string(), KICK_JSON.to_string())
        .with_shutdown_timeout(Duration::from_millis(500));
    let server = Server::bind(snapshot).await.unwrap();
    let addr = server.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
    let server_handle = tokio::spawn(server.run_with_shutdown(shutdown_rx));

    let mut tasks = vec![];
    for i in 0..16u32 {
        let task = tokio::spawn(async move {
            let stream = TcpStream::connect(addr).await.expect("connect");
            let mut conn = Framed::new(stream, PacketCodec);

            if i % 2 == 0 {
                conn.send(handshake_packet(2)).await.expect("send login");
                let reply = conn.next().await.unwrap().expect("kick reply");
                assert_eq!(reply.id, ids::LOGIN_KICK);
                assert_eq!(reply.string_payload().unwrap(), KICK_JSON);
                assert!(conn.next().await.is_none(), "login path should close");
            } else {
                conn.send(handshake_packet(1)).await.expect("send status");
                let reply = conn.next().await.unwrap().expect("status reply");
                assert_eq!(reply.id, ids::STATUS_RESPONSE);
                assert_eq!(reply.string_payload().unwrap(), STATUS_JSON);
            }
        });
        tasks.push(task);
    }

    for task in tasks {
        task.await.expect("task should complete");
    }

    let _ = shutdown_tx.send(()).await;
    server_handle.await.unwrap().unwrap();
}
