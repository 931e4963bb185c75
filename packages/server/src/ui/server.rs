//! Server execution logic.

use std::{
    net::{IpAddr, UdpSocket},
    sync::Arc,
};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::Method,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::{
    handler::{
        MAX_UPLOAD_BYTES, debug_room_state, download_file, health_check, list_files, upload_file,
        websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Slack on top of the file limit for multipart boundaries and the `uploader` field
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Cross-origin access for GET / POST from any origin
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

/// Build the application router
///
/// Exposed separately from [`Server::run`] so tests can serve it on an ephemeral port.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // WebSocket エンドポイント
        .route("/ws", get(websocket_handler))
        // ファイルの受け付けと配信
        .route(
            "/upload",
            post(upload_file).layer(DefaultBodyLimit::max(
                MAX_UPLOAD_BYTES as usize + MULTIPART_OVERHEAD_BYTES,
            )),
        )
        .route("/download/{storage_id}", get(download_file))
        // HTTP エンドポイント
        .route("/api/health", get(health_check))
        .route("/api/files", get(list_files))
        .route("/debug/room", get(debug_room_state))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// LAN chat and file-sharing server
///
/// # Example
///
/// ```ignore
/// let state = Arc::new(AppState::new(room_repository, file_repository, message_pusher, clock));
/// Server::new(state).run("0.0.0.0".to_string(), 3000).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Run the server until a shutdown signal arrives
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "0.0.0.0")
    /// * `port` - The port number to bind to (e.g., 3000)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = build_router(self.state);

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Madang server listening on {}", local_addr);
        tracing::info!("Local: http://localhost:{}", local_addr.port());
        match lan_ip() {
            Some(ip) => tracing::info!("LAN:   http://{}:{}", ip, local_addr.port()),
            None => tracing::warn!("Could not determine the LAN address"),
        }
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Address of the interface used for outbound traffic
///
/// Connecting a UDP socket sends no packets; it only selects a route.
fn lan_ip() -> Option<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    socket.local_addr().ok().map(|addr| addr.ip())
}
