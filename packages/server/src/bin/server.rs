//! Madang LAN chat and file-sharing server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin madang-server
//! cargo run --bin madang-server -- --host 0.0.0.0 --port 3000 --uploads-dir uploads
//! ```

use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use madang_server::{
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryRoomRepository, JsonFileMetadataRepository},
    },
    ui::{AppState, Server},
};
use madang_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "madang-server")]
#[command(about = "LAN chat and file-sharing server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "3000")]
    port: u16,

    /// Directory where shared files are stored
    #[arg(long, default_value = "uploads")]
    uploads_dir: PathBuf,

    /// JSON index of shared file metadata
    #[arg(long, default_value = "file-metadata.json")]
    metadata_file: PathBuf,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repositories
    // 2. MessagePusher
    // 3. AppState (UseCases)
    // 4. Server

    // 1. Create Repositories
    let room_repository = Arc::new(InMemoryRoomRepository::new());
    let file_repository =
        match JsonFileMetadataRepository::open(&args.metadata_file, &args.uploads_dir).await {
            Ok(repository) => Arc::new(repository),
            Err(e) => {
                tracing::error!(
                    "Failed to prepare storage directory '{}': {}",
                    args.uploads_dir.display(),
                    e
                );
                std::process::exit(1);
            }
        };
    tracing::info!(
        "Storing shared files in '{}' (index: '{}')",
        file_repository.storage_dir().display(),
        file_repository.index_path().display()
    );

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create UseCases
    let state = Arc::new(AppState::new(
        room_repository,
        file_repository,
        message_pusher,
        Arc::new(SystemClock),
    ));

    // 4. Create and run the server
    let server = Server::new(state);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
