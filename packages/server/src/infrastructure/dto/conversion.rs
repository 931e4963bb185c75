//! Conversion logic between domain entities and DTOs.
//!
//! Only the domain → DTO direction exists: inbound events are validated into
//! value objects by the usecase layer, not converted.

use crate::domain::{ChatEvent, ChatEventKind, FileRecord, RoomEvent, RoomSnapshot};
use crate::infrastructure::dto::{http, websocket as dto};

impl From<ChatEventKind> for dto::ChatEventType {
    fn from(kind: ChatEventKind) -> Self {
        match kind {
            ChatEventKind::Chat => Self::Chat,
            ChatEventKind::System => Self::System,
        }
    }
}

impl From<&ChatEvent> for dto::ChatEventDto {
    fn from(event: &ChatEvent) -> Self {
        Self {
            id: event.id.clone(),
            username: event.author.clone(),
            message: event.text.clone(),
            timestamp: event.timestamp.value(),
            r#type: event.kind.into(),
        }
    }
}

impl From<&FileRecord> for dto::FileInfoDto {
    fn from(record: &FileRecord) -> Self {
        Self {
            original_name: record.original_name.clone(),
            filename: record.storage_id.as_str().to_string(),
            size: record.size,
            timestamp: record.created_at.value(),
            uploader: record.uploader.clone(),
        }
    }
}

impl From<&RoomEvent> for dto::ServerEvent {
    fn from(event: &RoomEvent) -> Self {
        match event {
            RoomEvent::ChatHistory(events) => {
                Self::ChatHistory(events.iter().map(Into::into).collect())
            }
            RoomEvent::ExistingFile(record) => Self::ExistingFile(record.into()),
            RoomEvent::UsersList(names) => {
                Self::UsersList(names.iter().map(|n| n.as_str().to_string()).collect())
            }
            RoomEvent::UserJoined(name) => Self::UserJoined(name.as_str().to_string()),
            RoomEvent::UserLeft(name) => Self::UserLeft(name.as_str().to_string()),
            RoomEvent::ChatMessage(event) => Self::ChatMessage(event.into()),
            RoomEvent::Notification {
                from,
                message,
                timestamp,
            } => Self::Notification(dto::NotificationDto {
                from: from.as_str().to_string(),
                message: message.as_str().to_string(),
                timestamp: timestamp.value(),
            }),
            RoomEvent::UserTyping { username, typing } => Self::UserTyping(dto::TypingDto {
                username: username.as_str().to_string(),
                typing: *typing,
            }),
            RoomEvent::FileShared(record) => Self::FileShared(record.into()),
            RoomEvent::Error(message) => Self::Error(dto::ErrorDto {
                message: message.clone(),
            }),
        }
    }
}

impl http::RoomStateDto {
    pub fn new(snapshot: RoomSnapshot, connections: usize) -> Self {
        Self {
            users: snapshot.users.into_iter().map(|n| n.into_string()).collect(),
            typing: snapshot.typing.into_iter().map(|n| n.into_string()).collect(),
            history_len: snapshot.history_len,
            connections,
        }
    }
}
