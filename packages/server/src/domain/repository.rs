//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use std::path::PathBuf;

use async_trait::async_trait;

use super::{
    ChatEvent, ConnectionId, DisplayName, FileRecord, RegistryError, RoomSnapshot, StorageId,
};

/// Room Repository trait
///
/// 接続レジストリ・チャット履歴・入力中状態へのインターフェース。いずれもメモリ上にのみ存在する。
///
/// 各メソッドは 1 回の呼び出しで完結し、ロックを呼び出し元に持ち越さない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// 表示名の重複チェックとバインドを不可分に行う
    async fn bind_name(
        &self,
        connection: ConnectionId,
        name: DisplayName,
    ) -> Result<(), RegistryError>;

    /// バインドを解除し、解放された表示名を返す
    async fn unbind(&self, connection: &ConnectionId) -> Option<DisplayName>;

    async fn is_bound(&self, connection: &ConnectionId) -> bool;

    async fn name_of(&self, connection: &ConnectionId) -> Option<DisplayName>;

    /// バインド済みの全ての表示名（スナップショット）
    async fn live_names(&self) -> Vec<DisplayName>;

    /// 指定した接続以外の表示名
    async fn other_names(&self, connection: &ConnectionId) -> Vec<DisplayName>;

    /// チャット履歴に追加
    async fn append_event(&self, event: ChatEvent);

    /// 直近 `limit` 件の履歴を古い順に取得
    async fn recent_events(&self, limit: usize) -> Vec<ChatEvent>;

    async fn set_typing(&self, name: DisplayName, typing: bool);

    /// 入力中状態を消去し、消去されたかを返す
    async fn clear_typing(&self, name: &DisplayName) -> bool;

    async fn snapshot(&self) -> RoomSnapshot;
}

/// File Metadata Repository trait
///
/// 共有ファイルのメタデータの永続化インデックス。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileMetadataRepository: Send + Sync {
    /// レコードを追加して永続化する
    ///
    /// 永続化に失敗してもメモリ上の状態には反映される（失敗はログに残す）。
    async fn save(&self, record: FileRecord);

    /// 実ファイルが存在するレコードのみを返す
    async fn list_existing(&self) -> Vec<FileRecord>;

    async fn find(&self, storage_id: &StorageId) -> Option<FileRecord>;

    /// ストレージディレクトリ内の実在するファイルのパスを解決する
    ///
    /// ストレージディレクトリ外を指す場合やファイルが無い場合は `None`。
    async fn resolve_path(&self, storage_id: &StorageId) -> Option<PathBuf>;

    /// 新しいファイルの保存先パス
    fn path_for(&self, storage_id: &StorageId) -> PathBuf;

    /// ディスク上のファイルとインデックスを照合し、欠けているレコードを補う
    ///
    /// 追加したレコード数を返す。
    async fn reconcile(&self) -> usize;
}
