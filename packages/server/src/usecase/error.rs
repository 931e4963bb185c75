//! UseCase 層のエラー型

use thiserror::Error;

/// 入室（join-room）のエラー
///
/// `Display` はクライアントにそのまま返すメッセージ。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    /// サニタイズ後に空、または 20 文字超
    #[error("유효하지 않은 사용자명입니다.")]
    InvalidName,

    /// 同じ名前が既に使われている
    #[error("이미 사용중인 사용자명입니다.")]
    NameTaken,

    /// この接続は既に入室済み（クライアントには返さない）
    #[error("already joined as '{0}'")]
    AlreadyJoined(String),
}

/// チャット・通知・入力中通知のエラー
///
/// いずれもクライアントには返さず破棄する。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    /// 送信者がまだ入室していない
    #[error("sender has not joined")]
    NotJoined,

    /// 本文が空、または長すぎる
    #[error("invalid message: {0}")]
    Invalid(String),
}

/// ファイルダウンロードのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DownloadError {
    /// 許可されていない文字を含む
    #[error("Invalid filename")]
    InvalidStorageId,

    /// ファイルが無い、またはストレージ外を指している
    #[error("File not found")]
    NotFound,
}
