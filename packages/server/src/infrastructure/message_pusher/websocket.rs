//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - `RoomEvent` をワイヤーフォーマットにシリアライズし、配信先へ送信
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! 配信時はロックを取って送信先の sender を複製したらすぐに解放し、送信はスナップショットに
//! 対して行います。配信中に join / leave があってもブロックされません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{
        Audience, ConnectionId, MessagePushError, MessagePusher, PusherChannel, RoomEvent,
    },
    infrastructure::dto::websocket::ServerEvent,
};

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let pusher = WebSocketMessagePusher::new();
/// pusher.register_client(connection_id, tx).await;
/// pusher.push(Audience::All, &RoomEvent::UserJoined(name)).await?;
/// ```
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの WebSocket sender
    ///
    /// Key: ConnectionId
    /// Value: PusherChannel
    clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 配信先の sender を複製して返す（ロックはこの中でのみ保持）
    async fn snapshot(&self, audience: Audience) -> Vec<(ConnectionId, PusherChannel)> {
        let clients = self.clients.lock().await;
        clients
            .iter()
            .filter(|(id, _)| audience.includes(id))
            .map(|(id, sender)| (*id, sender.clone()))
            .collect()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(connection, sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection);
    }

    async fn unregister_client(&self, connection: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(connection);
        tracing::debug!("Connection '{}' unregistered from MessagePusher", connection);
    }

    async fn push(&self, audience: Audience, event: &RoomEvent) -> Result<usize, MessagePushError> {
        let payload = serde_json::to_string(&ServerEvent::from(event))
            .map_err(|e| MessagePushError::Serialization(e.to_string()))?;

        let targets = self.snapshot(audience).await;
        if let Audience::Only(connection) = audience {
            if targets.is_empty() {
                return Err(MessagePushError::ClientNotFound(connection.to_string()));
            }
        }

        let mut delivered = 0;
        for (connection, sender) in targets {
            // 一部の送信失敗は許容し、残りの接続への送信を続ける
            match sender.send(payload.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!(
                    "Failed to push '{}' to connection '{}': {}",
                    event.name(),
                    connection,
                    e
                ),
            }
        }
        tracing::debug!("Pushed '{}' to {} connections", event.name(), delivered);

        if let Audience::Only(connection) = audience {
            if delivered == 0 {
                return Err(MessagePushError::PushFailed(connection.to_string()));
            }
        }

        Ok(delivered)
    }

    async fn connection_count(&self) -> usize {
        self.clients.lock().await.len()
    }
}
