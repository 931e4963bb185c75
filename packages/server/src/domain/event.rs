//! クライアントへ配信するイベント
//!
//! ドメイン層はワイヤーフォーマットを知らない。`RoomEvent` は配信する内容だけを表し、
//! シリアライズは Infrastructure 層の MessagePusher 実装が行う。

use super::{
    entity::{ChatEvent, FileRecord},
    value_object::{ConnectionId, DisplayName, NotificationText, Timestamp},
};

/// 配信先の選択方針
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// 全ての接続
    All,
    /// 指定した接続以外の全ての接続
    AllExcept(ConnectionId),
    /// 指定した接続のみ
    Only(ConnectionId),
}

impl Audience {
    /// この配信先に `connection` が含まれるか
    pub fn includes(&self, connection: &ConnectionId) -> bool {
        match self {
            Audience::All => true,
            Audience::AllExcept(excluded) => excluded != connection,
            Audience::Only(target) => target == connection,
        }
    }
}

/// クライアントへ配信するイベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomEvent {
    ChatHistory(Vec<ChatEvent>),
    ExistingFile(FileRecord),
    UsersList(Vec<DisplayName>),
    UserJoined(DisplayName),
    UserLeft(DisplayName),
    ChatMessage(ChatEvent),
    Notification {
        from: DisplayName,
        message: NotificationText,
        timestamp: Timestamp,
    },
    UserTyping {
        username: DisplayName,
        typing: bool,
    },
    FileShared(FileRecord),
    Error(String),
}

impl RoomEvent {
    /// ログ出力用のイベント名
    pub fn name(&self) -> &'static str {
        match self {
            RoomEvent::ChatHistory(_) => "chat-history",
            RoomEvent::ExistingFile(_) => "existing-file",
            RoomEvent::UsersList(_) => "users-list",
            RoomEvent::UserJoined(_) => "user-joined",
            RoomEvent::UserLeft(_) => "user-left",
            RoomEvent::ChatMessage(_) => "chat-message",
            RoomEvent::Notification { .. } => "notification",
            RoomEvent::UserTyping { .. } => "user-typing",
            RoomEvent::FileShared(_) => "file-shared",
            RoomEvent::Error(_) => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audience_includes() {
        // テスト項目: 配信先の選択方針ごとに対象の接続が正しく判定される
        // given (前提条件):
        let sender = ConnectionId::generate();
        let other = ConnectionId::generate();

        // when (操作) / then (期待する結果):
        assert!(Audience::All.includes(&sender));
        assert!(Audience::All.includes(&other));
        assert!(!Audience::AllExcept(sender).includes(&sender));
        assert!(Audience::AllExcept(sender).includes(&other));
        assert!(Audience::Only(sender).includes(&sender));
        assert!(!Audience::Only(sender).includes(&other));
    }
}
