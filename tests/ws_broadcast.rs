//! End-to-end tests: real server, real WebSocket clients.

#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use dice_gateway::app_state::AppState;
use dice_gateway::build_app;
use dice_gateway::config::GatewayConfig;
use dice_gateway::domain::ResponsePayload;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Start the server on a random port with the quantum RNG switched off.
async fn start_server() -> (SocketAddr, AppState) {
    let config = GatewayConfig {
        qrng_enabled: false,
        ..GatewayConfig::default()
    };
    let Ok(state) = AppState::from_config(&config) else {
        panic!("state should build");
    };
    let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind failed");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local addr");
    };

    let app = build_app(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, state)
}

async fn connect(addr: SocketAddr) -> Client {
    let Ok((client, _)) = connect_async(format!("ws://{addr}/ws")).await else {
        panic!("ws connect failed");
    };
    client
}

/// Registration happens after the upgrade response, so wait for it.
async fn wait_for_connections(state: &AppState, expected: usize) {
    for _ in 0..100 {
        if state.roll_service.registry().len().await == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("registry never reached {expected} connections");
}

async fn next_payload(client: &mut Client) -> ResponsePayload {
    let Ok(Some(Ok(Message::Text(text)))) =
        tokio::time::timeout(Duration::from_secs(5), client.next()).await
    else {
        panic!("expected a text frame");
    };
    let Ok(payload) = serde_json::from_str(text.as_str()) else {
        panic!("frame is not a roll payload: {text}");
    };
    payload
}

async fn send(client: &mut Client, body: &str) {
    let Ok(()) = client.send(Message::text(body.to_string())).await else {
        panic!("ws send failed");
    };
}

async fn assert_silent(client: &mut Client) {
    let next = tokio::time::timeout(Duration::from_millis(300), client.next()).await;
    assert!(next.is_err(), "expected no frame, got {next:?}");
}

#[tokio::test]
async fn roll_is_broadcast_to_every_client_including_sender() {
    let (addr, state) = start_server().await;
    let mut bob = connect(addr).await;
    let mut alice = connect(addr).await;
    wait_for_connections(&state, 2).await;

    send(&mut bob, r#"{"user":"Bob","dice":["2d6","1d8"]}"#).await;

    let to_bob = next_payload(&mut bob).await;
    let to_alice = next_payload(&mut alice).await;
    assert_eq!(to_bob, to_alice);
    assert_eq!(to_bob.user, "Bob");

    let Some(d6) = to_bob.results.get("2d6") else {
        panic!("missing 2d6");
    };
    let Some(d8) = to_bob.results.get("1d8") else {
        panic!("missing 1d8");
    };
    assert_eq!(d6.len(), 2);
    assert!(d6.iter().all(|o| (1..=6).contains(o)));
    assert_eq!(d8.len(), 1);
    assert!(d8.iter().all(|o| (1..=8).contains(o)));
    let sum: u64 = d6.iter().chain(d8).map(|&o| u64::from(o)).sum();
    assert_eq!(to_bob.grand_total, sum);
}

#[tokio::test]
async fn invalid_request_is_dropped_and_connection_survives() {
    let (addr, state) = start_server().await;
    let mut bob = connect(addr).await;
    let mut alice = connect(addr).await;
    wait_for_connections(&state, 2).await;

    send(&mut bob, r#"{"user":"Bob","dice":["2d6","2x6"]}"#).await;
    send(&mut bob, "definitely not json").await;
    assert_silent(&mut alice).await;

    send(&mut bob, r#"{"user":"Bob","dice":["1d20"]}"#).await;
    let payload = next_payload(&mut alice).await;
    assert_eq!(payload.results.get("1d20").map(Vec::len), Some(1));
    assert_eq!(state.roll_service.history(None).await.len(), 1);
}

#[tokio::test]
async fn disconnected_client_is_unregistered() {
    let (addr, state) = start_server().await;
    let mut stays = connect(addr).await;
    let mut leaves = connect(addr).await;
    wait_for_connections(&state, 2).await;

    let Ok(()) = leaves.close(None).await else {
        panic!("close failed");
    };
    wait_for_connections(&state, 1).await;

    send(&mut stays, r#"{"user":"Ann","dice":["3d4"]}"#).await;
    let payload = next_payload(&mut stays).await;
    assert_eq!(payload.user, "Ann");
    assert_eq!(payload.results.get("3d4").map(Vec::len), Some(3));
}
