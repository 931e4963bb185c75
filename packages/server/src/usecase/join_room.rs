//! UseCase: 入室処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 名前のサニタイズ・重複チェックと、入室時の配信・履歴記録
//!
//! ### なぜこのテストが必要か
//! - 名前の一意性はこのシステム唯一の入室制御
//! - 入室イベントが本人以外に届き、本人には他の参加者一覧だけが届くことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：新しい名前での入室
//! - 異常系：不正な名前、使用中の名前、入室済みの接続からの再入室

use std::sync::Arc;

use madang_shared::time::Clock;

use crate::domain::{
    Audience, ChatEvent, ConnectionId, DisplayName, EventSequencer, MessagePusher,
    RegistryError, RoomEvent, RoomRepository, Timestamp,
};

use super::error::JoinError;

/// 入室のユースケース
pub struct JoinRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    sequencer: Arc<EventSequencer>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
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

    /// 入室を実行
    ///
    /// # Arguments
    ///
    /// * `connection` - 入室する接続
    /// * `raw_name` - クライアントが送ってきた名前（未サニタイズ）
    ///
    /// # Returns
    ///
    /// * `Ok(DisplayName)` - バインドされた表示名
    /// * `Err(JoinError)` - 入室失敗（`InvalidName` / `NameTaken` は本人にエラーを送信済み）
    pub async fn execute(
        &self,
        connection: ConnectionId,
        raw_name: &str,
    ) -> Result<DisplayName, JoinError> {
        // 名前は 1 セッションにつき 1 度だけ設定できる
        if let Some(bound) = self.repository.name_of(&connection).await {
            return Err(JoinError::AlreadyJoined(bound.into_string()));
        }

        // 1. 名前のサニタイズと検証
        let name = match DisplayName::parse(raw_name) {
            Ok(name) => name,
            Err(e) => {
                tracing::debug!("Rejected display name '{}': {}", raw_name, e);
                return Err(self.reject(connection, JoinError::InvalidName).await);
            }
        };

        let _order = self.sequencer.begin().await;

        // 2. 重複チェックとバインド（不可分）
        match self.repository.bind_name(connection, name.clone()).await {
            Ok(()) => {}
            Err(RegistryError::NameTaken(_)) => {
                return Err(self.reject(connection, JoinError::NameTaken).await);
            }
            Err(RegistryError::AlreadyBound(bound)) => {
                return Err(JoinError::AlreadyJoined(bound));
            }
        }

        // 3. 履歴に参加メッセージを記録
        let timestamp = Timestamp::new(self.clock.now_millis());
        self.repository
            .append_event(ChatEvent::joined(&name, timestamp))
            .await;

        // 4. 他の接続に user-joined、本人に users-list
        if let Err(e) = self
            .message_pusher
            .push(Audience::AllExcept(connection), &RoomEvent::UserJoined(name.clone()))
            .await
        {
            tracing::warn!("Failed to broadcast user-joined for '{}': {}", name, e);
        }

        let others = self.repository.other_names(&connection).await;
        if let Err(e) = self
            .message_pusher
            .push(Audience::Only(connection), &RoomEvent::UsersList(others))
            .await
        {
            tracing::warn!("Failed to send users-list to '{}': {}", name, e);
        }

        Ok(name)
    }

    /// 本人にだけエラーを送る
    async fn reject(&self, connection: ConnectionId, error: JoinError) -> JoinError {
        let event = RoomEvent::Error(error.to_string());
        if let Err(e) = self
            .message_pusher
            .push(Audience::Only(connection), &event)
            .await
        {
            tracing::warn!("Failed to send join error to '{}': {}", connection, e);
        }
        error
    }
}
