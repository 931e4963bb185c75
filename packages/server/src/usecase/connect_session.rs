//! UseCase: 接続開始処理
//!
//! 新しいトランスポート接続を配信先として登録し、直近のチャット履歴と
//! 既存ファイル一覧をその接続にだけ送る。
//!
//! 既存ファイルは過去の出来事として送るため、チャット履歴への記録や
//! 「ファイルが共有されました」という通知は行わない。
//!
//! 登録から再送までを順序づけ区間の中で行うので、他の接続からの配信が
//! chat-history より先に届いたり、再送と配信の両方で同じイベントが
//! 届いたりすることはない。

use std::sync::Arc;

use crate::domain::{
    Audience, ConnectionId, EventSequencer, FileMetadataRepository, MessagePushError,
    MessagePusher, PusherChannel, REPLAY_LIMIT, RoomEvent, RoomRepository,
};

/// 接続開始のユースケース
pub struct ConnectSessionUseCase {
    /// Repository（接続・履歴）
    room_repository: Arc<dyn RoomRepository>,
    /// Repository（ファイルメタデータ）
    file_repository: Arc<dyn FileMetadataRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    sequencer: Arc<EventSequencer>,
}

impl ConnectSessionUseCase {
    /// 新しい ConnectSessionUseCase を作成
    pub fn new(
        room_repository: Arc<dyn RoomRepository>,
        file_repository: Arc<dyn FileMetadataRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        sequencer: Arc<EventSequencer>,
    ) -> Self {
        Self {
            room_repository,
            file_repository,
            message_pusher,
            sequencer,
        }
    }

    /// 接続開始を実行
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 再送したファイル数
    /// * `Err(MessagePushError)` - 新しい接続への送信失敗
    pub async fn execute(
        &self,
        connection: ConnectionId,
        sender: PusherChannel,
    ) -> Result<usize, MessagePushError> {
        let _order = self.sequencer.begin().await;

        // 1. 配信先として登録
        self.message_pusher
            .register_client(connection, sender)
            .await;

        // 2. 直近のチャット履歴
        let history = self.room_repository.recent_events(REPLAY_LIMIT).await;
        self.message_pusher
            .push(Audience::Only(connection), &RoomEvent::ChatHistory(history))
            .await?;

        // 3. 既存ファイル一覧（1 ファイルずつ）
        let files = self.file_repository.list_existing().await;
        let count = files.len();
        for record in files {
            self.message_pusher
                .push(Audience::Only(connection), &RoomEvent::ExistingFile(record))
                .await?;
        }

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            ChatEvent, ChatHistoryLog, ChatText, DisplayName, FileRecord,
            MockFileMetadataRepository, MockRoomRepository, StorageId, Timestamp,
        },
        infrastructure::{
            dto::websocket::ServerEvent, message_pusher::WebSocketMessagePusher,
            repository::InMemoryRoomRepository,
        },
        usecase::{MessageError, SendChatMessageUseCase},
    };
    use madang_shared::time::FixedClock;
    use std::{sync::Mutex, time::Duration};
    use tokio::{runtime::Handle, sync::mpsc, task::JoinHandle};

    fn file(id: &str, ts: i64) -> FileRecord {
        FileRecord::new(
            StorageId::new(id).unwrap(),
            format!("{}.txt", id),
            10,
            Some("alice"),
            Timestamp::new(ts),
        )
    }

    #[tokio::test]
    async fn test_connect_replays_history_then_files() {
        // テスト項目: 新しい接続に直近 50 件の履歴と既存ファイルがこの順で届く
        // given (前提条件):
        let room = Arc::new(InMemoryRoomRepository::with_history(ChatHistoryLog::new()));
        let alice = DisplayName::parse("alice").unwrap();
        for i in 0..60 {
            let text = ChatText::parse(&format!("m{}", i)).unwrap();
            room.append_event(ChatEvent::chat(&alice, text, Timestamp::new(i)))
                .await;
        }
        let mut files = MockFileMetadataRepository::new();
        files
            .expect_list_existing()
            .times(1)
            .returning(|| vec![file("f1", 1), file("f2", 2)]);
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = ConnectSessionUseCase::new(
            room,
            Arc::new(files),
            pusher,
            Arc::new(EventSequencer::new()),
        );

        // when (操作):
        let (tx, mut rx) = mpsc::unbounded_channel();
        let result = usecase.execute(ConnectionId::generate(), tx).await;

        // then (期待する結果):
        assert_eq!(result, Ok(2));
        let first: ServerEvent = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        match first {
            ServerEvent::ChatHistory(history) => {
                assert_eq!(history.len(), 50);
                assert_eq!(history[0].message, "m10");
                assert_eq!(history[49].message, "m59");
            }
            other => panic!("unexpected first event: {:?}", other),
        }
        for expected in ["f1", "f2"] {
            let event: ServerEvent = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
            match event {
                ServerEvent::ExistingFile(info) => assert_eq!(info.filename, expected),
                other => panic!("unexpected event: {:?}", other),
            }
        }
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_connect_does_not_touch_history() {
        // テスト項目: 既存ファイルの再送はチャット履歴に記録されない
        // given (前提条件):
        let room = Arc::new(InMemoryRoomRepository::new());
        let mut files = MockFileMetadataRepository::new();
        files
            .expect_list_existing()
            .returning(|| vec![file("f1", 1)]);
        let usecase = ConnectSessionUseCase::new(
            room.clone(),
            Arc::new(files),
            Arc::new(WebSocketMessagePusher::new()),
            Arc::new(EventSequencer::new()),
        );

        // when (操作):
        let (tx, _rx) = mpsc::unbounded_channel();
        usecase.execute(ConnectionId::generate(), tx).await.unwrap();

        // then (期待する結果):
        assert!(room.recent_events(REPLAY_LIMIT).await.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_chat_sent_during_connect_arrives_once_after_history() {
        // テスト項目: 接続処理の途中で送られたチャットは chat-history の後に 1 度だけ届く
        // given (前提条件):
        let inner = Arc::new(InMemoryRoomRepository::new());
        let alice = ConnectionId::generate();
        inner
            .bind_name(alice, DisplayName::parse("alice").unwrap())
            .await
            .unwrap();
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let sequencer = Arc::new(EventSequencer::new());
        let chat = Arc::new(SendChatMessageUseCase::new(
            inner.clone(),
            pusher.clone(),
            Arc::new(FixedClock::new(7)),
            sequencer.clone(),
        ));
        let in_flight: Arc<Mutex<Option<JoinHandle<Result<ChatEvent, MessageError>>>>> =
            Arc::new(Mutex::new(None));

        // 履歴を読む瞬間に別の接続からチャットが送られる
        let mut room = MockRoomRepository::new();
        {
            let inner = inner.clone();
            let in_flight = in_flight.clone();
            room.expect_recent_events().times(1).returning(move |limit| {
                let chat = chat.clone();
                let handle = tokio::spawn(async move { chat.execute(alice, "hello").await });
                *in_flight.lock().unwrap() = Some(handle);
                std::thread::sleep(Duration::from_millis(50));
                let inner = inner.clone();
                tokio::task::block_in_place(|| {
                    Handle::current().block_on(async move { inner.recent_events(limit).await })
                })
            });
        }
        let mut files = MockFileMetadataRepository::new();
        files.expect_list_existing().returning(Vec::new);
        let usecase =
            ConnectSessionUseCase::new(Arc::new(room), Arc::new(files), pusher, sequencer);

        // when (操作):
        let (tx, mut rx) = mpsc::unbounded_channel();
        usecase.execute(ConnectionId::generate(), tx).await.unwrap();
        let handle = in_flight.lock().unwrap().take().unwrap();
        let sent = handle.await.unwrap().unwrap();

        // then (期待する結果):
        let first: ServerEvent = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        match first {
            ServerEvent::ChatHistory(history) => assert!(history.is_empty()),
            other => panic!("unexpected first event: {:?}", other),
        }
        let second: ServerEvent = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        match second {
            ServerEvent::ChatMessage(dto) => assert_eq!(dto.id, sent.id),
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(rx.try_recv().is_err());
    }
}
