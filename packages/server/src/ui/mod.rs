//! Transport boundary: axum router, WebSocket and HTTP handlers.

mod handler;
mod server;
mod signal;
pub mod state;

pub use handler::file::MAX_UPLOAD_BYTES;
pub use server::{Server, build_router};
pub use state::AppState;
