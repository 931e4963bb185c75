//! 値オブジェクト
//!
//! クライアントから受け取る文字列はすべてここでサニタイズ・検証される。
//! 一度生成された値オブジェクトは常に不変条件を満たす。

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueObjectError;

/// マークアップ上意味を持つため除去される文字
pub const UNSAFE_CHARS: [char; 5] = ['<', '>', '"', '\'', '&'];

/// Strip `< > " ' &` and trim surrounding whitespace.
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !UNSAFE_CHARS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// サニタイズ後に 1..=max 文字であることを検証する
fn sanitize_bounded(raw: &str, max: usize) -> Result<String, ValueObjectError> {
    let value = sanitize(raw);
    let actual = value.chars().count();
    if actual == 0 {
        return Err(ValueObjectError::Empty);
    }
    if actual > max {
        return Err(ValueObjectError::TooLong { max, actual });
    }
    Ok(value)
}

/// トランスポート層の接続 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// 新しい接続 ID を発行する
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ルーム内でユニークな表示名
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DisplayName(String);

impl DisplayName {
    pub const MAX_CHARS: usize = 20;

    /// 生の入力をサニタイズして表示名を生成する
    pub fn parse(raw: &str) -> Result<Self, ValueObjectError> {
        sanitize_bounded(raw, Self::MAX_CHARS).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// チャットメッセージ本文（最大 500 文字）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatText(String);

impl ChatText {
    pub const MAX_CHARS: usize = 500;

    pub fn parse(raw: &str) -> Result<Self, ValueObjectError> {
        sanitize_bounded(raw, Self::MAX_CHARS).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// 通知メッセージ本文（最大 100 文字）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationText(String);

impl NotificationText {
    pub const MAX_CHARS: usize = 100;

    pub fn parse(raw: &str) -> Result<Self, ValueObjectError> {
        sanitize_bounded(raw, Self::MAX_CHARS).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// ストレージ上のファイル名（`[a-zA-Z0-9._-]+`）
///
/// ファイルシステム上で安全な文字のみを許可する。`..` のような値は文字種としては
/// 通るため、ストレージ外へのパス解決はリポジトリ側で別途拒否する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StorageId(String);

impl StorageId {
    pub fn new(value: impl Into<String>) -> Result<Self, ValueObjectError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValueObjectError::Empty);
        }
        let valid = value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if !valid {
            return Err(ValueObjectError::InvalidCharacters(value));
        }
        Ok(Self(value))
    }

    /// アップロード用の新しいストレージ ID を発行する（32 桁の 16 進数）
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StorageId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StorageId> for String {
    fn from(value: StorageId) -> Self {
        value.0
    }
}

impl fmt::Display for StorageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
