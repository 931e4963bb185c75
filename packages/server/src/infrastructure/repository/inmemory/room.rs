//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//!
//! 接続レジストリ・チャット履歴・入力中状態はそれぞれ独立した Mutex で守られる。
//! ロックは各メソッドの中でのみ保持され、配信（MessagePusher）をまたいで保持されることはない。

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ChatEvent, ChatHistoryLog, ConnectionId, ConnectionRegistry, DisplayName, RegistryError,
    RoomRepository, RoomSnapshot, TypingPresence,
};

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    registry: Mutex<ConnectionRegistry>,
    history: Mutex<ChatHistoryLog>,
    typing: Mutex<TypingPresence>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new() -> Self {
        Self::with_history(ChatHistoryLog::new())
    }

    /// 履歴の容量を指定して作成（テスト用）
    pub fn with_history(history: ChatHistoryLog) -> Self {
        Self {
            registry: Mutex::new(ConnectionRegistry::new()),
            history: Mutex::new(history),
            typing: Mutex::new(TypingPresence::new()),
        }
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn bind_name(
        &self,
        connection: ConnectionId,
        name: DisplayName,
    ) -> Result<(), RegistryError> {
        let mut registry = self.registry.lock().await;
        registry.bind(connection, name)
    }

    async fn unbind(&self, connection: &ConnectionId) -> Option<DisplayName> {
        let mut registry = self.registry.lock().await;
        registry.unbind(connection)
    }

    async fn is_bound(&self, connection: &ConnectionId) -> bool {
        let registry = self.registry.lock().await;
        registry.is_bound(connection)
    }

    async fn name_of(&self, connection: &ConnectionId) -> Option<DisplayName> {
        let registry = self.registry.lock().await;
        registry.name_of(connection).cloned()
    }

    async fn live_names(&self) -> Vec<DisplayName> {
        let registry = self.registry.lock().await;
        registry.live_names()
    }

    async fn other_names(&self, connection: &ConnectionId) -> Vec<DisplayName> {
        let registry = self.registry.lock().await;
        registry.names_except(connection)
    }

    async fn append_event(&self, event: ChatEvent) {
        let mut history = self.history.lock().await;
        history.append(event);
    }

    async fn recent_events(&self, limit: usize) -> Vec<ChatEvent> {
        let history = self.history.lock().await;
        history.recent(limit)
    }

    async fn set_typing(&self, name: DisplayName, typing: bool) {
        let mut presence = self.typing.lock().await;
        presence.set(name, typing);
    }

    async fn clear_typing(&self, name: &DisplayName) -> bool {
        let mut presence = self.typing.lock().await;
        presence.clear(name)
    }

    async fn snapshot(&self) -> RoomSnapshot {
        let users = self.registry.lock().await.live_names();
        let typing = self.typing.lock().await.names();
        let history_len = self.history.lock().await.len();

        RoomSnapshot {
            users,
            typing,
            history_len,
        }
    }
}
