//! UseCase: 切断処理
//!
//! 接続を配信先から外し、入室済みであれば名前を解放して退出を通知する。
//! 入室前の切断では誰にも何も送らない。

use std::sync::Arc;

use madang_shared::time::Clock;

use crate::domain::{
    Audience, ChatEvent, ConnectionId, DisplayName, EventSequencer, MessagePusher, RoomEvent,
    RoomRepository, Timestamp,
};

/// 切断のユースケース
pub struct DisconnectSessionUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    sequencer: Arc<EventSequencer>,
}

impl DisconnectSessionUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        sequencer: Arc<EventSequencer>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
            sequencer,
        }
    }

    /// 切断を実行
    ///
    /// # Returns
    ///
    /// 解放された表示名（入室前の切断なら `None`）
    pub async fn execute(&self, connection: ConnectionId) -> Option<DisplayName> {
        // 1. 配信先から外す（以降この接続には何も送らない）
        self.message_pusher.unregister_client(&connection).await;

        let _order = self.sequencer.begin().await;

        // 2. 名前を解放
        let name = self.repository.unbind(&connection).await?;

        // 3. 履歴に退出メッセージを記録し、入力中状態を消す
        let timestamp = Timestamp::new(self.clock.now_millis());
        self.repository
            .append_event(ChatEvent::left(&name, timestamp))
            .await;
        self.repository.clear_typing(&name).await;

        // 4. 残りの接続に user-left
        if let Err(e) = self
            .message_pusher
            .push(Audience::AllExcept(connection), &RoomEvent::UserLeft(name.clone()))
            .await
        {
            tracing::warn!("Failed to broadcast user-left for '{}': {}", name, e);
        }

        Some(name)
    }
}
