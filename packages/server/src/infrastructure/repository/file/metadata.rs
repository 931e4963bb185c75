//! JSON File Metadata Repository 実装
//!
//! ストレージ ID からメタデータへのマップを 1 つの JSON ファイルに保存する。
//! 追記ログは持たず、レコードを追加するたびにファイル全体を書き直す。
//!
//! ## 起動時の照合
//!
//! - インデックスが読めない（破損・読み込み失敗）場合は空として扱い、起動は継続する
//! - ストレージディレクトリにあってインデックスに無いファイルは、先頭バイトから
//!   拡張子を推定してレコードを合成する
//! - インデックスにあって実ファイルが無いレコードは削除せずに残し、一覧からは隠す

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::{fs, io::AsyncReadExt, sync::Mutex};

use crate::domain::{
    FileMetadataRepository, FileRecord, SNIFF_SAMPLE_LEN, StorageId, Timestamp,
    UNKNOWN_EXTENSION, UNKNOWN_UPLOADER, detect_extension,
};
use madang_shared::time::{get_timestamp_millis, system_time_to_millis, timestamp_to_rfc3339};

/// インデックスファイルの読み書きエラー
#[derive(Debug, Error)]
pub enum FileStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// インデックスファイルに保存される 1 ファイル分のメタデータ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredMetadata {
    original_name: String,
    #[serde(default = "default_uploader")]
    uploader: String,
    #[serde(default)]
    size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<i64>,
}

fn default_uploader() -> String {
    UNKNOWN_UPLOADER.to_string()
}

impl From<&FileRecord> for StoredMetadata {
    fn from(record: &FileRecord) -> Self {
        Self {
            original_name: record.original_name.clone(),
            uploader: record.uploader.clone(),
            size: record.size,
            timestamp: Some(record.created_at.value()),
        }
    }
}

impl StoredMetadata {
    fn to_record(&self, storage_id: StorageId) -> FileRecord {
        FileRecord::new(
            storage_id,
            self.original_name.clone(),
            self.size,
            Some(self.uploader.as_str()),
            Timestamp::new(self.timestamp.unwrap_or_else(get_timestamp_millis)),
        )
    }
}

/// Key: storage id
type Index = BTreeMap<String, StoredMetadata>;

/// JSON ファイルを使った FileMetadataRepository 実装
pub struct JsonFileMetadataRepository {
    index_path: PathBuf,
    storage_dir: PathBuf,
    entries: Mutex<Index>,
}

impl JsonFileMetadataRepository {
    /// インデックスを読み込み、ストレージディレクトリと照合して Repository を作成
    ///
    /// ストレージディレクトリが無ければ作成する。エラーになるのはディレクトリを作成できない場合のみ。
    pub async fn open(
        index_path: impl Into<PathBuf>,
        storage_dir: impl Into<PathBuf>,
    ) -> Result<Self, FileStoreError> {
        let index_path = index_path.into();
        let storage_dir = storage_dir.into();
        fs::create_dir_all(&storage_dir).await?;

        let entries = match load_index(&index_path).await {
            Ok(entries) => {
                tracing::info!(
                    "Loaded file metadata for {} files from '{}'",
                    entries.len(),
                    index_path.display()
                );
                entries
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to load file metadata index '{}': {}. Rebuilding from storage directory",
                    index_path.display(),
                    e
                );
                Index::new()
            }
        };

        let repository = Self {
            index_path,
            storage_dir,
            entries: Mutex::new(entries),
        };

        let synthesized = repository.reconcile().await;
        if synthesized > 0 {
            tracing::info!("Synthesized metadata for {} untracked files", synthesized);
        }

        Ok(repository)
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// インデックス全体を書き直す
    async fn persist(&self, entries: &Index) -> Result<(), FileStoreError> {
        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&self.index_path, json).await?;
        Ok(())
    }

    async fn is_index_file(&self, path: &Path) -> bool {
        match (
            fs::canonicalize(path).await,
            fs::canonicalize(&self.index_path).await,
        ) {
            (Ok(candidate), Ok(index)) => candidate == index,
            _ => false,
        }
    }
}

async fn load_index(path: &Path) -> Result<Index, FileStoreError> {
    match fs::read_to_string(path).await {
        Ok(content) => Ok(serde_json::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Index::new()),
        Err(e) => Err(e.into()),
    }
}

async fn read_sample(path: &Path) -> std::io::Result<Vec<u8>> {
    let file = fs::File::open(path).await?;
    let mut sample = Vec::with_capacity(SNIFF_SAMPLE_LEN);
    let mut reader = file.take(SNIFF_SAMPLE_LEN as u64);
    reader.read_to_end(&mut sample).await?;
    Ok(sample)
}

async fn sniff_extension(path: &Path) -> &'static str {
    match read_sample(path).await {
        Ok(sample) => detect_extension(&sample),
        Err(e) => {
            tracing::warn!("Failed to read '{}' for type detection: {}", path.display(), e);
            UNKNOWN_EXTENSION
        }
    }
}

/// インデックスに無いファイルのメタデータを合成する
async fn synthesize(
    storage_id: &StorageId,
    path: &Path,
    metadata: &std::fs::Metadata,
) -> StoredMetadata {
    let extension = sniff_extension(path).await;
    let prefix: String = storage_id.as_str().chars().take(8).collect();
    let timestamp = metadata
        .modified()
        .map(system_time_to_millis)
        .unwrap_or_else(|_| get_timestamp_millis());
    tracing::debug!(
        "Synthesized metadata for '{}' ({}, modified {})",
        storage_id,
        extension,
        timestamp_to_rfc3339(timestamp)
    );

    StoredMetadata {
        original_name: format!("파일_{}{}", prefix, extension),
        uploader: UNKNOWN_UPLOADER.to_string(),
        size: metadata.len(),
        timestamp: Some(timestamp),
    }
}

#[async_trait]
impl FileMetadataRepository for JsonFileMetadataRepository {
    async fn save(&self, record: FileRecord) {
        let mut entries = self.entries.lock().await;
        entries.insert(
            record.storage_id.as_str().to_string(),
            StoredMetadata::from(&record),
        );

        if let Err(e) = self.persist(&entries).await {
            tracing::error!(
                "Failed to persist file metadata for '{}': {}",
                record.storage_id,
                e
            );
        }
    }

    async fn list_existing(&self) -> Vec<FileRecord> {
        let snapshot = self.entries.lock().await.clone();

        let mut records = Vec::with_capacity(snapshot.len());
        for (key, stored) in snapshot {
            let Ok(storage_id) = StorageId::new(key) else {
                continue;
            };
            let present = fs::metadata(self.path_for(&storage_id))
                .await
                .map(|m| m.is_file())
                .unwrap_or(false);
            if present {
                records.push(stored.to_record(storage_id));
            }
        }

        records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.storage_id.cmp(&b.storage_id))
        });
        records
    }

    async fn find(&self, storage_id: &StorageId) -> Option<FileRecord> {
        let entries = self.entries.lock().await;
        entries
            .get(storage_id.as_str())
            .map(|stored| stored.to_record(storage_id.clone()))
    }

    async fn resolve_path(&self, storage_id: &StorageId) -> Option<PathBuf> {
        let root = fs::canonicalize(&self.storage_dir).await.ok()?;
        let candidate = fs::canonicalize(self.path_for(storage_id)).await.ok()?;
        if !candidate.starts_with(&root) {
            tracing::warn!(
                "Refusing to resolve '{}' outside of storage directory",
                storage_id
            );
            return None;
        }

        let metadata = fs::metadata(&candidate).await.ok()?;
        metadata.is_file().then_some(candidate)
    }

    fn path_for(&self, storage_id: &StorageId) -> PathBuf {
        self.storage_dir.join(storage_id.as_str())
    }

    async fn reconcile(&self) -> usize {
        let mut dir = match fs::read_dir(&self.storage_dir).await {
            Ok(dir) => dir,
            Err(e) => {
                tracing::warn!(
                    "Failed to read storage directory '{}': {}",
                    self.storage_dir.display(),
                    e
                );
                return 0;
            }
        };

        let mut entries = self.entries.lock().await;
        let mut added = 0;
        loop {
            let entry = match dir.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!("Failed to read storage directory entry: {}", e);
                    break;
                }
            };

            let Ok(file_name) = entry.file_name().into_string() else {
                continue;
            };
            if entries.contains_key(&file_name) {
                continue;
            }
            let Ok(storage_id) = StorageId::new(file_name.clone()) else {
                tracing::debug!("Skipping '{}': not a valid storage id", file_name);
                continue;
            };

            let path = entry.path();
            let metadata = match entry.metadata().await {
                Ok(metadata) if metadata.is_file() => metadata,
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!("Failed to stat '{}': {}", path.display(), e);
                    continue;
                }
            };
            if self.is_index_file(&path).await {
                continue;
            }

            let stored = synthesize(&storage_id, &path, &metadata).await;
            tracing::info!(
                "Recovered untracked file '{}' as '{}'",
                file_name,
                stored.original_name
            );
            entries.insert(file_name, stored);
            added += 1;
        }

        if added > 0 {
            if let Err(e) = self.persist(&entries).await {
                tracing::error!("Failed to persist reconciled file metadata: {}", e);
            }
        }

        added
    }
}
