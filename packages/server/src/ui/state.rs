//! Shared application state.

use std::sync::Arc;

use madang_shared::time::Clock;

use crate::{
    domain::{EventSequencer, FileMetadataRepository, MessagePusher, RoomRepository},
    usecase::{
        ConnectSessionUseCase, DisconnectSessionUseCase, DownloadFileUseCase,
        GetRoomStateUseCase, JoinRoomUseCase, ListFilesUseCase, SendChatMessageUseCase,
        SendNotificationUseCase, SetTypingUseCase, ShareFileUseCase,
    },
};

/// Shared application state
///
/// ハンドラーは UseCase だけを通して Repository / MessagePusher にアクセスする。
pub struct AppState {
    pub connect_session_usecase: Arc<ConnectSessionUseCase>,
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    pub disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
    pub send_chat_message_usecase: Arc<SendChatMessageUseCase>,
    pub send_notification_usecase: Arc<SendNotificationUseCase>,
    pub set_typing_usecase: Arc<SetTypingUseCase>,
    pub share_file_usecase: Arc<ShareFileUseCase>,
    pub download_file_usecase: Arc<DownloadFileUseCase>,
    pub list_files_usecase: Arc<ListFilesUseCase>,
    pub get_room_state_usecase: Arc<GetRoomStateUseCase>,
}

impl AppState {
    /// Wire every UseCase to the given Repository / MessagePusher implementations
    ///
    /// 配信を行う UseCase はすべて同じ EventSequencer を共有する。
    pub fn new(
        room_repository: Arc<dyn RoomRepository>,
        file_repository: Arc<dyn FileMetadataRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let sequencer = Arc::new(EventSequencer::new());
        Self {
            connect_session_usecase: Arc::new(ConnectSessionUseCase::new(
                room_repository.clone(),
                file_repository.clone(),
                message_pusher.clone(),
                sequencer.clone(),
            )),
            join_room_usecase: Arc::new(JoinRoomUseCase::new(
                room_repository.clone(),
                message_pusher.clone(),
                clock.clone(),
                sequencer.clone(),
            )),
            disconnect_session_usecase: Arc::new(DisconnectSessionUseCase::new(
                room_repository.clone(),
                message_pusher.clone(),
                clock.clone(),
                sequencer.clone(),
            )),
            send_chat_message_usecase: Arc::new(SendChatMessageUseCase::new(
                room_repository.clone(),
                message_pusher.clone(),
                clock.clone(),
                sequencer.clone(),
            )),
            send_notification_usecase: Arc::new(SendNotificationUseCase::new(
                room_repository.clone(),
                message_pusher.clone(),
                clock.clone(),
                sequencer.clone(),
            )),
            set_typing_usecase: Arc::new(SetTypingUseCase::new(
                room_repository.clone(),
                message_pusher.clone(),
                sequencer.clone(),
            )),
            share_file_usecase: Arc::new(ShareFileUseCase::new(
                file_repository.clone(),
                message_pusher.clone(),
                clock,
                sequencer,
            )),
            download_file_usecase: Arc::new(DownloadFileUseCase::new(file_repository.clone())),
            list_files_usecase: Arc::new(ListFilesUseCase::new(file_repository)),
            get_room_state_usecase: Arc::new(GetRoomStateUseCase::new(
                room_repository,
                message_pusher,
            )),
        }
    }
}
