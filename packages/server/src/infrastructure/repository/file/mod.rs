//! ファイルシステムを使った Repository 実装

pub mod metadata;

pub use metadata::{FileStoreError, JsonFileMetadataRepository};
