//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{Stream, StreamExt},
};
use tokio::sync::{Notify, mpsc};

use crate::{
    domain::ConnectionId,
    infrastructure::dto::websocket::ClientEvent,
    ui::state::AppState,
    usecase::JoinError,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// Every event addressed to this connection goes through this single channel,
/// so the client receives them in the order they were pushed.
///
/// # Arguments
///
/// * `rx` - Channel receiver registered with the MessagePusher
/// * `sender` - WebSocket sink to send messages to this client
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection = ConnectionId::generate();
    let (tx, rx) = mpsc::unbounded_channel();
    let (sender, receiver) = socket.split();

    // 配信先として登録し、履歴と既存ファイルを送る（他のどのイベントよりも先に届く）
    match state
        .connect_session_usecase
        .execute(connection, tx)
        .await
    {
        Ok(files) => {
            tracing::info!(
                "Connection '{}' opened, replayed history and {} files",
                connection,
                files
            );
        }
        Err(e) => {
            tracing::warn!("Failed to initialize connection '{}': {}", connection, e);
            state.disconnect_session_usecase.execute(connection).await;
            return;
        }
    }

    let mut send_task = pusher_loop(rx, sender);

    let stop = Arc::new(Notify::new());
    let mut recv_task = tokio::spawn(read_loop(
        receiver,
        state.clone(),
        connection,
        stop.clone(),
    ));

    let writer_closed = tokio::select! {
        _ = &mut recv_task => false,
        _ = &mut send_task => true,
    };
    if writer_closed {
        // 処理中のフレームは最後まで実行させてから閉じる
        stop.notify_one();
        if let Err(e) = recv_task.await {
            tracing::warn!("Reader for '{}' ended abnormally: {}", connection, e);
        }
    } else {
        send_task.abort();
    }

    match state.disconnect_session_usecase.execute(connection).await {
        Some(name) => tracing::info!("'{}' left the chat", name),
        None => tracing::debug!("Connection '{}' closed before joining", connection),
    }
}

/// Reads inbound frames and dispatches them until the client goes away or `stop` is notified.
///
/// `stop` is only checked between frames, so a frame whose dispatch has started
/// always runs to completion.
async fn read_loop<S>(
    mut receiver: S,
    state: Arc<AppState>,
    connection: ConnectionId,
    stop: Arc<Notify>,
) where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    loop {
        let msg = tokio::select! {
            _ = stop.notified() => {
                tracing::debug!("Writer for '{}' closed, stop reading", connection);
                break;
            }
            msg = receiver.next() => msg,
        };

        let msg = match msg {
            Some(Ok(msg)) => msg,
            Some(Err(e)) => {
                tracing::debug!("WebSocket error on '{}': {}", connection, e);
                break;
            }
            None => break,
        };

        match msg {
            Message::Text(text) => dispatch(&state, connection, &text).await,
            Message::Close(_) => {
                tracing::debug!("Connection '{}' requested close", connection);
                break;
            }
            // Ping/pong is handled by axum, binary frames are not part of the protocol
            _ => {}
        }
    }
}

/// Route one inbound frame to its UseCase
async fn dispatch(state: &AppState, connection: ConnectionId, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Dropping malformed frame from '{}': {}", connection, e);
            return;
        }
    };

    match event {
        ClientEvent::JoinRoom(raw_name) => {
            match state.join_room_usecase.execute(connection, &raw_name).await {
                Ok(name) => tracing::info!("'{}' joined the chat", name),
                Err(JoinError::AlreadyJoined(bound)) => {
                    tracing::debug!("Ignoring second join-room from '{}'", bound);
                }
                Err(e) => tracing::info!("Rejected join-room from '{}': {}", connection, e),
            }
        }
        ClientEvent::ChatMessage(body) => {
            if let Err(e) = state
                .send_chat_message_usecase
                .execute(connection, &body.message)
                .await
            {
                tracing::debug!("Dropped chat-message from '{}': {}", connection, e);
            }
        }
        ClientEvent::Notification(body) => {
            if let Err(e) = state
                .send_notification_usecase
                .execute(connection, &body.message)
                .await
            {
                tracing::debug!("Dropped notification from '{}': {}", connection, e);
            }
        }
        ClientEvent::TypingStart => set_typing(state, connection, true).await,
        ClientEvent::TypingStop => set_typing(state, connection, false).await,
    }
}

async fn set_typing(state: &AppState, connection: ConnectionId, typing: bool) {
    if let Err(e) = state.set_typing_usecase.execute(connection, typing).await {
        tracing::debug!("Dropped typing update from '{}': {}", connection, e);
    }
}
