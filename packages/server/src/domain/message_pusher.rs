//! MessagePusher trait 定義
//!
//! クライアントへのイベント配信（BroadcastHub）のインターフェース。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{Audience, ConnectionId, MessagePushError, RoomEvent};

/// 接続ごとの送信チャンネル
///
/// 接続ごとに 1 本のチャンネルを持つため、同じ接続への配信順序は `push` の呼び出し順になる。
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// トランスポートの接続を登録
    async fn register_client(&self, connection: ConnectionId, sender: PusherChannel);

    /// トランスポートの接続を登録解除
    async fn unregister_client(&self, connection: &ConnectionId);

    /// 配信先にイベントを送る
    ///
    /// 呼び出し時点の接続のスナップショットに対して送信し、一部の接続への送信失敗は
    /// 他の接続への送信を妨げない。送信できた接続数を返す。
    async fn push(&self, audience: Audience, event: &RoomEvent) -> Result<usize, MessagePushError>;

    async fn connection_count(&self) -> usize;
}
