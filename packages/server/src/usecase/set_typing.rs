//! UseCase: 入力中状態の更新処理

use std::sync::Arc;

use crate::domain::{
    Audience, ConnectionId, EventSequencer, MessagePusher, RoomEvent, RoomRepository,
};

use super::error::MessageError;

/// 入力中状態更新のユースケース
pub struct SetTypingUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    sequencer: Arc<EventSequencer>,
}

impl SetTypingUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        sequencer: Arc<EventSequencer>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            sequencer,
        }
    }

    /// 入力中状態を更新し、送信者以外に user-typing を送る
    ///
    /// 状態が変わらない場合（start の連続など）も毎回送る。
    pub async fn execute(
        &self,
        connection: ConnectionId,
        typing: bool,
    ) -> Result<(), MessageError> {
        let username = self
            .repository
            .name_of(&connection)
            .await
            .ok_or(MessageError::NotJoined)?;

        let _order = self.sequencer.begin().await;
        self.repository.set_typing(username.clone(), typing).await;

        if let Err(e) = self
            .message_pusher
            .push(
                Audience::AllExcept(connection),
                &RoomEvent::UserTyping {
                    username: username.clone(),
                    typing,
                },
            )
            .await
        {
            tracing::warn!("Failed to broadcast typing state of '{}': {}", username, e);
        }

        Ok(())
    }
}
