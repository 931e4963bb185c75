//! Helpers shared by the integration tests.
//!
//! Each test starts the real router on an ephemeral port with its own
//! temporary storage directory, and talks to it over WebSocket and HTTP.

#![allow(dead_code)]

use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use futures_util::{SinkExt, StreamExt};
use madang_server::{
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryRoomRepository, JsonFileMetadataRepository},
    },
    ui::{AppState, build_router},
};
use madang_shared::time::SystemClock;
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::{net::TcpStream, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

const RECV_TIMEOUT: Duration = Duration::from_secs(3);
const SILENCE_TIMEOUT: Duration = Duration::from_millis(200);

/// In-process server bound to 127.0.0.1 on an ephemeral port
pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
    dir: TempDir,
}

impl TestServer {
    /// Start a server with an empty storage directory
    pub async fn start() -> Self {
        Self::start_in(tempfile::tempdir().unwrap()).await
    }

    /// Start a server on an existing directory (storage at `<dir>/uploads`)
    pub async fn start_in(dir: TempDir) -> Self {
        let file_repository = JsonFileMetadataRepository::open(
            dir.path().join("file-metadata.json"),
            dir.path().join("uploads"),
        )
        .await
        .unwrap();
        let state = Arc::new(AppState::new(
            Arc::new(InMemoryRoomRepository::new()),
            Arc::new(file_repository),
            Arc::new(WebSocketMessagePusher::new()),
            Arc::new(SystemClock),
        ));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, build_router(state)).await.unwrap();
        });

        Self { addr, handle, dir }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn storage_dir(&self) -> PathBuf {
        self.dir.path().join("uploads")
    }

    /// Fetch `/debug/room`
    pub async fn room_state(&self) -> Value {
        reqwest::get(self.http_url("/debug/room"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Number of regular files in `dir`
pub fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_file())
        .count()
}

/// WebSocket client speaking the `{"event", "data"}` envelope
pub struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    /// Connect and consume the initial `chat-history`, returning it
    pub async fn connect(server: &TestServer) -> (Self, Value) {
        let (stream, _) = connect_async(server.ws_url()).await.unwrap();
        let mut client = Self { stream };
        let history = client.recv().await;
        assert_eq!(history["event"], "chat-history");
        (client, history["data"].clone())
    }

    /// Connect, then join with `name` and consume the `users-list` reply
    pub async fn join(server: &TestServer, name: &str) -> (Self, Value) {
        let (mut client, _) = Self::connect(server).await;
        client.send(json!({"event": "join-room", "data": name})).await;
        let users = client.recv_event("users-list").await;
        (client, users)
    }

    pub async fn send(&mut self, event: Value) {
        self.send_raw(&event.to_string()).await;
    }

    pub async fn send_raw(&mut self, text: &str) {
        self.stream
            .send(Message::Text(text.to_string().into()))
            .await
            .unwrap();
    }

    /// Next event envelope
    pub async fn recv(&mut self) -> Value {
        loop {
            let msg = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .expect("timed out waiting for an event")
                .expect("connection closed")
                .unwrap();
            if let Message::Text(text) = msg {
                return serde_json::from_str(&text).unwrap();
            }
        }
    }

    /// Next event, asserting its name; returns `data`
    pub async fn recv_event(&mut self, name: &str) -> Value {
        let event = self.recv().await;
        assert_eq!(event["event"], name, "unexpected event: {}", event);
        event["data"].clone()
    }

    /// Assert that nothing arrives for a short while
    pub async fn expect_silence(&mut self) {
        let next = tokio::time::timeout(SILENCE_TIMEOUT, self.stream.next()).await;
        if let Ok(Some(Ok(Message::Text(text)))) = next {
            panic!("expected no event, got {}", text.as_str());
        }
    }

    pub async fn close(mut self) {
        self.stream.close(None).await.unwrap();
    }
}
