//! エンティティ

use uuid::Uuid;

use super::value_object::{ChatText, DisplayName, StorageId, Timestamp};

/// システムメッセージの送信者名
pub const SYSTEM_AUTHOR: &str = "시스템";

/// アップロード者が不明な場合の名前
pub const UNKNOWN_UPLOADER: &str = "Unknown";

/// チャット履歴に記録されるイベントの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatEventKind {
    Chat,
    System,
}

/// チャット履歴の 1 エントリ
///
/// 生成後に変更されることはなく、履歴の上限を超えたときに古い順に破棄される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEvent {
    pub id: String,
    pub kind: ChatEventKind,
    pub author: String,
    pub text: String,
    pub timestamp: Timestamp,
}

impl ChatEvent {
    /// ユーザーのチャットメッセージ
    pub fn chat(author: &DisplayName, text: ChatText, timestamp: Timestamp) -> Self {
        Self {
            id: Self::next_id(),
            kind: ChatEventKind::Chat,
            author: author.as_str().to_string(),
            text: text.into_string(),
            timestamp,
        }
    }

    /// 参加時のシステムメッセージ
    pub fn joined(name: &DisplayName, timestamp: Timestamp) -> Self {
        Self::system(format!("{}님이 채팅에 참여했습니다.", name), timestamp)
    }

    /// 退出時のシステムメッセージ
    pub fn left(name: &DisplayName, timestamp: Timestamp) -> Self {
        Self::system(format!("{}님이 채팅을 나갔습니다.", name), timestamp)
    }

    fn system(text: String, timestamp: Timestamp) -> Self {
        Self {
            id: Self::next_id(),
            kind: ChatEventKind::System,
            author: SYSTEM_AUTHOR.to_string(),
            text,
            timestamp,
        }
    }

    fn next_id() -> String {
        Uuid::new_v4().to_string()
    }
}

/// 共有ファイルのメタデータ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub storage_id: StorageId,
    pub original_name: String,
    pub size: u64,
    pub uploader: String,
    pub created_at: Timestamp,
}

impl FileRecord {
    /// 新しい FileRecord を作成する
    ///
    /// アップロード者が空または未指定の場合は `"Unknown"` になる。
    pub fn new(
        storage_id: StorageId,
        original_name: impl Into<String>,
        size: u64,
        uploader: Option<&str>,
        created_at: Timestamp,
    ) -> Self {
        let uploader = uploader
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(UNKNOWN_UPLOADER)
            .to_string();

        Self {
            storage_id,
            original_name: original_name.into(),
            size,
            uploader,
            created_at,
        }
    }
}

/// 診断用のルーム状態スナップショット
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSnapshot {
    pub users: Vec<DisplayName>,
    pub typing: Vec<DisplayName>,
    pub history_len: usize,
}
