//! UseCase: ルーム状態取得処理（診断用）

use std::sync::Arc;

use crate::domain::{MessagePusher, RoomRepository, RoomSnapshot};

/// ルーム状態取得のユースケース
pub struct GetRoomStateUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

/// ルーム状態と、名前を持たない接続も含めた接続数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomState {
    pub snapshot: RoomSnapshot,
    pub connections: usize,
}

impl GetRoomStateUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    pub async fn execute(&self) -> RoomState {
        RoomState {
            snapshot: self.repository.snapshot().await,
            connections: self.message_pusher.connection_count().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ConnectionId, DisplayName},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository,
        },
    };
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_room_state_counts_unbound_connections() {
        // テスト項目: 入室前の接続は接続数に含まれるが、ユーザー一覧には含まれない
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let alice = ConnectionId::generate();
        let (tx_alice, _rx_alice) = mpsc::unbounded_channel();
        let (tx_other, _rx_other) = mpsc::unbounded_channel();
        pusher.register_client(alice, tx_alice).await;
        pusher
            .register_client(ConnectionId::generate(), tx_other)
            .await;
        let alice_name = DisplayName::parse("alice").unwrap();
        repository.bind_name(alice, alice_name.clone()).await.unwrap();
        repository.set_typing(alice_name.clone(), true).await;
        let usecase = GetRoomStateUseCase::new(repository, pusher);

        // when (操作):
        let state = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(state.connections, 2);
        assert_eq!(state.snapshot.users, vec![alice_name.clone()]);
        assert_eq!(state.snapshot.typing, vec![alice_name]);
        assert_eq!(state.snapshot.history_len, 0);
    }
}
