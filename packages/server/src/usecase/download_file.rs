//! UseCase: ファイルダウンロード処理
//!
//! ストレージ ID を検証し、ストレージディレクトリ内の実ファイルと
//! 表示に使う元のファイル名を解決する。

use std::{path::PathBuf, sync::Arc};

use crate::domain::{FileMetadataRepository, StorageId};

use super::error::DownloadError;

/// ダウンロード対象のファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub path: PathBuf,
    /// レコードの元のファイル名（レコードが無い場合はストレージ ID）
    pub display_name: String,
}

/// ファイルダウンロードのユースケース
pub struct DownloadFileUseCase {
    file_repository: Arc<dyn FileMetadataRepository>,
}

impl DownloadFileUseCase {
    pub fn new(file_repository: Arc<dyn FileMetadataRepository>) -> Self {
        Self { file_repository }
    }

    /// ダウンロード対象を解決する
    ///
    /// # Returns
    ///
    /// * `Ok(DownloadTarget)` - 実在するファイル
    /// * `Err(DownloadError::InvalidStorageId)` - 許可されていない文字を含む
    /// * `Err(DownloadError::NotFound)` - ファイルが無い、またはストレージ外
    pub async fn execute(&self, raw_storage_id: &str) -> Result<DownloadTarget, DownloadError> {
        let storage_id =
            StorageId::new(raw_storage_id).map_err(|_| DownloadError::InvalidStorageId)?;

        let path = self
            .file_repository
            .resolve_path(&storage_id)
            .await
            .ok_or(DownloadError::NotFound)?;

        let display_name = match self.file_repository.find(&storage_id).await {
            Some(record) => record.original_name,
            None => storage_id.to_string(),
        };

        Ok(DownloadTarget { path, display_name })
    }
}
