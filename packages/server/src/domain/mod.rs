//! Domain layer.
//!
//! Value objects, entities and the in-memory state objects of the chat hub,
//! plus the traits the usecase layer depends on.

pub mod entity;
pub mod error;
pub mod event;
pub mod history;
pub mod message_pusher;
pub mod registry;
pub mod repository;
pub mod sequencer;
pub mod sniff;
pub mod typing;
pub mod value_object;

pub use entity::{
    ChatEvent, ChatEventKind, FileRecord, RoomSnapshot, SYSTEM_AUTHOR, UNKNOWN_UPLOADER,
};
pub use error::{MessagePushError, RegistryError, ValueObjectError};
pub use event::{Audience, RoomEvent};
pub use history::{ChatHistoryLog, HISTORY_CAPACITY, REPLAY_LIMIT};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use registry::ConnectionRegistry;
pub use repository::{FileMetadataRepository, RoomRepository};
pub use sequencer::EventSequencer;
pub use sniff::{SNIFF_SAMPLE_LEN, UNKNOWN_EXTENSION, detect_extension};
pub use typing::TypingPresence;
pub use value_object::{
    ChatText, ConnectionId, DisplayName, NotificationText, StorageId, Timestamp, sanitize,
};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
#[cfg(test)]
pub use repository::{MockFileMetadataRepository, MockRoomRepository};
