//! UseCase: チャットメッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendChatMessageUseCase::execute() メソッド
//! - 履歴への記録と、送信者を含む全接続への配信
//!
//! ### どのような状況を想定しているか
//! - 正常系：入室済みの接続からのメッセージ
//! - 異常系：未入室の接続、空・長すぎるメッセージ（いずれも黙って破棄）

use std::sync::Arc;

use madang_shared::time::Clock;

use crate::domain::{
    Audience, ChatEvent, ChatText, ConnectionId, EventSequencer, MessagePusher, RoomEvent,
    RoomRepository, Timestamp,
};

use super::error::MessageError;

/// チャットメッセージ送信のユースケース
pub struct SendChatMessageUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    sequencer: Arc<EventSequencer>,
}

impl SendChatMessageUseCase {
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

    /// チャットメッセージの送信を実行
    ///
    /// # Returns
    ///
    /// * `Ok(ChatEvent)` - 履歴に記録され配信されたイベント
    /// * `Err(MessageError)` - 破棄された
    pub async fn execute(
        &self,
        connection: ConnectionId,
        raw_message: &str,
    ) -> Result<ChatEvent, MessageError> {
        let author = self
            .repository
            .name_of(&connection)
            .await
            .ok_or(MessageError::NotJoined)?;
        let text =
            ChatText::parse(raw_message).map_err(|e| MessageError::Invalid(e.to_string()))?;

        // 記録順と配信順を一致させる
        let _order = self.sequencer.begin().await;
        let event = ChatEvent::chat(&author, text, Timestamp::new(self.clock.now_millis()));
        self.repository.append_event(event.clone()).await;

        if let Err(e) = self
            .message_pusher
            .push(Audience::All, &RoomEvent::ChatMessage(event.clone()))
            .await
        {
            tracing::warn!("Failed to broadcast chat message from '{}': {}", author, e);
        }

        Ok(event)
    }
}
