//! ルーム内イベントの順序づけ
//!
//! 「履歴へ記録して配信する」区間と「履歴を読んで新しい接続を登録する」区間を
//! 1 本の列に並べる。接続レジストリ・履歴・入力中状態の各ロックとは独立しており、
//! 区間内で行う配信は接続ごとの無制限キューへの投入だけなので待ちは発生しない。

use tokio::sync::{Mutex, MutexGuard};

/// 配信順序を決めるルーム単位のロック
#[derive(Debug, Default)]
pub struct EventSequencer {
    order: Mutex<()>,
}

impl EventSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 順序づけ区間を開始する。返したガードを落とすまで他の区間は待つ
    pub async fn begin(&self) -> MutexGuard<'_, ()> {
        self.order.lock().await
    }
}
