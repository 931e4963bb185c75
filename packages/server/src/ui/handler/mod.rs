pub mod file;
pub mod http;
pub mod websocket;

pub use file::{MAX_UPLOAD_BYTES, download_file, upload_file};
pub use http::{debug_room_state, health_check, list_files};
pub use websocket::websocket_handler;
