//! UseCase 層
//!
//! 1 つの操作につき 1 つの構造体を持ち、Domain 層の trait（`Arc<dyn Trait>`）にだけ依存する。

pub mod connect_session;
pub mod disconnect_session;
pub mod download_file;
pub mod error;
pub mod get_room_state;
pub mod join_room;
pub mod list_files;
pub mod send_chat_message;
pub mod send_notification;
pub mod set_typing;
pub mod share_file;

pub use connect_session::ConnectSessionUseCase;
pub use disconnect_session::DisconnectSessionUseCase;
pub use download_file::{DownloadFileUseCase, DownloadTarget};
pub use error::{DownloadError, JoinError, MessageError};
pub use get_room_state::{GetRoomStateUseCase, RoomState};
pub use join_room::JoinRoomUseCase;
pub use list_files::ListFilesUseCase;
pub use send_chat_message::SendChatMessageUseCase;
pub use send_notification::SendNotificationUseCase;
pub use set_typing::SetTypingUseCase;
pub use share_file::ShareFileUseCase;
