//! UseCase: 共有ファイル一覧取得処理

use std::sync::Arc;

use crate::domain::{FileMetadataRepository, FileRecord};

/// 共有ファイル一覧取得のユースケース
pub struct ListFilesUseCase {
    file_repository: Arc<dyn FileMetadataRepository>,
}

impl ListFilesUseCase {
    pub fn new(file_repository: Arc<dyn FileMetadataRepository>) -> Self {
        Self { file_repository }
    }

    /// 実ファイルが存在するレコードを (timestamp, storage id) 順に返す
    pub async fn execute(&self) -> Vec<FileRecord> {
        self.file_repository.list_existing().await
    }
}
