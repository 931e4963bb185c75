//! UseCase: ファイル共有処理
//!
//! アップロード境界でディスクに書き込まれたファイルのメタデータを記録し、
//! アップロードした本人を含む全接続に file-shared を送る。

use std::{path::PathBuf, sync::Arc};

use madang_shared::time::Clock;

use crate::domain::{
    Audience, EventSequencer, FileMetadataRepository, FileRecord, MessagePusher, RoomEvent,
    StorageId, Timestamp,
};

/// ファイル共有のユースケース
pub struct ShareFileUseCase {
    file_repository: Arc<dyn FileMetadataRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    sequencer: Arc<EventSequencer>,
}

impl ShareFileUseCase {
    pub fn new(
        file_repository: Arc<dyn FileMetadataRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        sequencer: Arc<EventSequencer>,
    ) -> Self {
        Self {
            file_repository,
            message_pusher,
            clock,
            sequencer,
        }
    }

    /// 新しいストレージ ID と、その書き込み先パスを払い出す
    pub fn allocate(&self) -> (StorageId, PathBuf) {
        let storage_id = StorageId::generate();
        let path = self.file_repository.path_for(&storage_id);
        (storage_id, path)
    }

    /// 保存済みのファイルを記録して配信する
    ///
    /// # Arguments
    ///
    /// * `storage_id` - `allocate` で払い出した ID
    /// * `original_name` - クライアントが申告したファイル名（空ならストレージ ID を使う）
    /// * `size` - 書き込んだバイト数
    /// * `uploader` - アップロード者（空・未指定は "Unknown"）
    pub async fn execute(
        &self,
        storage_id: StorageId,
        original_name: &str,
        size: u64,
        uploader: Option<&str>,
    ) -> FileRecord {
        let original_name = match original_name.trim() {
            "" => storage_id.to_string(),
            name => name.to_string(),
        };
        let record = FileRecord::new(
            storage_id,
            original_name,
            size,
            uploader,
            Timestamp::new(self.clock.now_millis()),
        );

        // 新しい接続への existing-file 再送と file-shared が重ならないようにする
        let _order = self.sequencer.begin().await;

        // 1. 永続化（失敗してもメモリ上には残り、配信は続ける）
        self.file_repository.save(record.clone()).await;

        // 2. 全接続に file-shared
        if let Err(e) = self
            .message_pusher
            .push(Audience::All, &RoomEvent::FileShared(record.clone()))
            .await
        {
            tracing::warn!("Failed to broadcast file-shared for '{}': {}", record.storage_id, e);
        }

        record
    }
}
