//! HTTP API DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::FileInfoDto;

/// Response of `POST /upload`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileInfoDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl UploadResponse {
    pub fn uploaded(file: FileInfoDto) -> Self {
        Self {
            success: true,
            file: Some(file),
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            file: None,
            message: Some(message.into()),
        }
    }
}

/// Error body of `GET /download/{filename}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Response of `GET /debug/room`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomStateDto {
    pub users: Vec<String>,
    pub typing: Vec<String>,
    pub history_len: usize,
    /// Transport connections, including ones that have not joined yet
    pub connections: usize,
}
