//! UseCase: 通知送信処理
//!
//! 通知は送信者以外の全接続に届く。チャット履歴には記録しない。

use std::sync::Arc;

use madang_shared::time::Clock;

use crate::domain::{
    Audience, ConnectionId, EventSequencer, MessagePusher, NotificationText, RoomEvent,
    RoomRepository, Timestamp,
};

use super::error::MessageError;

/// 通知送信のユースケース
pub struct SendNotificationUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    sequencer: Arc<EventSequencer>,
}

impl SendNotificationUseCase {
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

    /// 通知の送信を実行
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 通知が届いた接続数
    /// * `Err(MessageError)` - 破棄された
    pub async fn execute(
        &self,
        connection: ConnectionId,
        raw_message: &str,
    ) -> Result<usize, MessageError> {
        let from = self
            .repository
            .name_of(&connection)
            .await
            .ok_or(MessageError::NotJoined)?;
        let message = NotificationText::parse(raw_message)
            .map_err(|e| MessageError::Invalid(e.to_string()))?;

        let _order = self.sequencer.begin().await;
        let event = RoomEvent::Notification {
            from: from.clone(),
            message,
            timestamp: Timestamp::new(self.clock.now_millis()),
        };

        match self
            .message_pusher
            .push(Audience::AllExcept(connection), &event)
            .await
        {
            Ok(delivered) => Ok(delivered),
            Err(e) => {
                tracing::warn!("Failed to broadcast notification from '{}': {}", from, e);
                Ok(0)
            }
        }
    }
}
