//! Repository 実装
//!
//! - `inmemory`: 接続・履歴・入力中状態（プロセス内のみ）
//! - `file`: 共有ファイルのメタデータ（JSON ファイルに永続化）

pub mod file;
pub mod inmemory;

pub use file::JsonFileMetadataRepository;
pub use inmemory::InMemoryRoomRepository;
