//! ドメイン層のエラー型

use thiserror::Error;

/// 値オブジェクトの生成に失敗した理由
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// サニタイズ後に空文字列になった
    #[error("value is empty after sanitization")]
    Empty,

    /// 文字数が上限を超えている
    #[error("value is too long ({actual} chars, max {max})")]
    TooLong { max: usize, actual: usize },

    /// 許可されていない文字を含んでいる
    #[error("value contains invalid characters: '{0}'")]
    InvalidCharacters(String),
}

/// 接続レジストリへの名前バインドに失敗した理由
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// 同じ表示名が既に他の接続にバインドされている
    #[error("display name '{0}' is already taken")]
    NameTaken(String),

    /// この接続には既に表示名がバインドされている
    #[error("connection is already bound to '{0}'")]
    AlreadyBound(String),
}

/// メッセージ送信（通知）時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// 送信先の接続が登録されていない
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    /// チャンネルへの送信に失敗した
    #[error("failed to push message: {0}")]
    PushFailed(String),

    /// ペイロードのシリアライズに失敗した
    #[error("failed to serialize event: {0}")]
    Serialization(String),
}
