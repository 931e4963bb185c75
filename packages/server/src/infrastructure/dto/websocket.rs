//! WebSocket event DTOs.
//!
//! Every text frame is one JSON envelope `{"event": "<name>", "data": <payload>}`.
//! Events without a payload omit `data`.

use serde::{Deserialize, Serialize};

/// Events sent by clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    JoinRoom(String),
    ChatMessage(MessageBody),
    Notification(MessageBody),
    TypingStart,
    TypingStop,
}

/// Payload of `chat-message` and `notification` sent by clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

/// Events sent by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    ChatHistory(Vec<ChatEventDto>),
    ExistingFile(FileInfoDto),
    UsersList(Vec<String>),
    UserJoined(String),
    UserLeft(String),
    ChatMessage(ChatEventDto),
    Notification(NotificationDto),
    UserTyping(TypingDto),
    FileShared(FileInfoDto),
    Error(ErrorDto),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatEventType {
    Chat,
    System,
}

/// One chat log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEventDto {
    pub id: String,
    pub username: String,
    pub message: String,
    pub timestamp: i64,
    pub r#type: ChatEventType,
}

/// Shared file metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfoDto {
    pub original_name: String,
    /// Storage id, used for `/download/{filename}`
    pub filename: String,
    pub size: u64,
    pub timestamp: i64,
    pub uploader: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationDto {
    pub from: String,
    pub message: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingDto {
    pub username: String,
    pub typing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDto {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_join_room() {
        // テスト項目: join-room のエンベロープがパースされる
        // given (前提条件):
        let json = r#"{"event":"join-room","data":"alice"}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(event, ClientEvent::JoinRoom("alice".to_string()));
    }

    #[test]
    fn test_parse_typing_without_data() {
        // テスト項目: data を持たない typing-start がパースされる
        // given (前提条件):
        let json = r#"{"event":"typing-start"}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(event, ClientEvent::TypingStart);
    }

    #[test]
    fn test_parse_unknown_event_fails() {
        // テスト項目: 未知のイベント名はパースエラーになる
        // given (前提条件):
        let json = r#"{"event":"delete-everything","data":{}}"#;

        // when (操作):
        let result = serde_json::from_str::<ClientEvent>(json);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_chat_message() {
        // テスト項目: chat-message がワイヤーフォーマットでシリアライズされる
        // given (前提条件):
        let event = ServerEvent::ChatMessage(ChatEventDto {
            id: "id-1".to_string(),
            username: "alice".to_string(),
            message: "hi".to_string(),
            timestamp: 1000,
            r#type: ChatEventType::Chat,
        });

        // when (操作):
        let json = serde_json::to_value(&event).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            serde_json::json!({
                "event": "chat-message",
                "data": {
                    "id": "id-1",
                    "username": "alice",
                    "message": "hi",
                    "timestamp": 1000,
                    "type": "chat"
                }
            })
        );
    }

    #[test]
    fn test_serialize_file_info_keys() {
        // テスト項目: ファイル情報が camelCase のキーでシリアライズされる
        // given (前提条件):
        let event = ServerEvent::FileShared(FileInfoDto {
            original_name: "report.pdf".to_string(),
            filename: "abc123".to_string(),
            size: 1200,
            timestamp: 5,
            uploader: "alice".to_string(),
        });

        // when (操作):
        let json = serde_json::to_value(&event).unwrap();

        // then (期待する結果):
        assert_eq!(json["event"], "file-shared");
        assert_eq!(json["data"]["originalName"], "report.pdf");
        assert_eq!(json["data"]["filename"], "abc123");
        assert_eq!(json["data"]["size"], 1200);
    }
}
