//! File upload and download handlers.
//!
//! Multipart parsing, the size limit and the MIME filter live here. The core
//! only ever sees a file that has already been written to its storage path.

use std::{
    path::{Path as FsPath, PathBuf},
    sync::Arc,
};

use axum::{
    Json,
    body::Body,
    extract::{
        Path, State,
        multipart::{Field, Multipart, MultipartError},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tokio::{fs, io::AsyncWriteExt};

use crate::{
    domain::StorageId,
    infrastructure::dto::{
        http::{ErrorResponse, UploadResponse},
        websocket::FileInfoDto,
    },
    ui::state::AppState,
    usecase::DownloadError,
};

/// Largest accepted file (50 MiB)
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

const FILE_FIELD: &str = "file";
const UPLOADER_FIELD: &str = "uploader";

#[derive(Debug, Error)]
enum UploadError {
    #[error("File too large")]
    TooLarge,

    #[error("{0}")]
    Multipart(#[from] MultipartError),

    #[error("Failed to store file: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let status = match &self {
            UploadError::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            UploadError::Multipart(e) => e.status(),
            UploadError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(UploadResponse::failed(self.to_string()))).into_response()
    }
}

impl IntoResponse for DownloadError {
    fn into_response(self) -> Response {
        let status = match self {
            DownloadError::InvalidStorageId => StatusCode::BAD_REQUEST,
            DownloadError::NotFound => StatusCode::NOT_FOUND,
        };
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

/// A file written to storage, waiting to be recorded
struct StoredUpload {
    storage_id: StorageId,
    path: PathBuf,
    original_name: String,
    size: u64,
}

/// Only images, text, PDF and ZIP are shared
fn is_allowed_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence.starts_with("image/")
        || essence.starts_with("text/")
        || essence == "application/pdf"
        || essence == "application/zip"
}

/// Stream one multipart field to `path`, returning the number of bytes written
async fn write_field(mut field: Field<'_>, path: &FsPath) -> Result<u64, UploadError> {
    let mut file = fs::File::create(path).await?;
    let mut written: u64 = 0;

    while let Some(chunk) = field.chunk().await? {
        written += chunk.len() as u64;
        if written > MAX_UPLOAD_BYTES {
            return Err(UploadError::TooLarge);
        }
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    Ok(written)
}

async fn remove_partial(path: &FsPath) {
    if let Err(e) = fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!("Failed to remove partial upload '{}': {}", path.display(), e);
        }
    }
}

/// `POST /upload`
pub async fn upload_file(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    let mut stored: Option<StoredUpload> = None;
    let mut uploader: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("Malformed upload request: {}", e);
                if let Some(upload) = stored.take() {
                    remove_partial(&upload.path).await;
                }
                return UploadError::from(e).into_response();
            }
        };

        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(FILE_FIELD) if stored.is_none() => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                if !is_allowed_content_type(&content_type) {
                    tracing::warn!("Rejected upload with content type '{}'", content_type);
                    continue;
                }
                let original_name = field.file_name().unwrap_or_default().to_string();
                let (storage_id, path) = state.share_file_usecase.allocate();

                match write_field(field, &path).await {
                    Ok(size) => {
                        stored = Some(StoredUpload {
                            storage_id,
                            path,
                            original_name,
                            size,
                        })
                    }
                    Err(e) => {
                        tracing::warn!("Upload of '{}' failed: {}", original_name, e);
                        remove_partial(&path).await;
                        return e.into_response();
                    }
                }
            }
            Some(UPLOADER_FIELD) => match field.text().await {
                Ok(text) => uploader = Some(text),
                Err(e) => tracing::warn!("Failed to read uploader field: {}", e),
            },
            _ => {}
        }
    }

    let Some(upload) = stored else {
        return (
            StatusCode::BAD_REQUEST,
            Json(UploadResponse::failed("No file uploaded")),
        )
            .into_response();
    };

    let record = state
        .share_file_usecase
        .execute(
            upload.storage_id,
            &upload.original_name,
            upload.size,
            uploader.as_deref(),
        )
        .await;
    tracing::info!(
        "'{}' uploaded '{}' ({} bytes) as '{}'",
        record.uploader,
        record.original_name,
        record.size,
        record.storage_id
    );

    Json(UploadResponse::uploaded(FileInfoDto::from(&record))).into_response()
}

/// `GET /download/{storage_id}`
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(storage_id): Path<String>,
) -> Result<Response, DownloadError> {
    let target = state.download_file_usecase.execute(&storage_id).await?;

    let bytes = fs::read(&target.path).await.map_err(|e| {
        tracing::warn!("Failed to read '{}': {}", target.path.display(), e);
        DownloadError::NotFound
    })?;
    tracing::info!("Serving '{}' as '{}'", storage_id, target.display_name);

    let disposition = format!(
        "attachment; filename*=UTF-8''{}",
        urlencoding::encode(&target.display_name)
    );
    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from(bytes),
    )
        .into_response())
}
