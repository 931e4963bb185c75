//! チャット履歴
//!
//! 上限付きの追記専用ログ。上限を超えると古いものから破棄する（FIFO）。

use std::collections::VecDeque;

use super::entity::ChatEvent;

/// 保持するイベント数の上限
pub const HISTORY_CAPACITY: usize = 1000;

/// 新規接続時に再送するイベント数
pub const REPLAY_LIMIT: usize = 50;

#[derive(Debug, Clone)]
pub struct ChatHistoryLog {
    events: VecDeque<ChatEvent>,
    capacity: usize,
}

impl ChatHistoryLog {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity.min(HISTORY_CAPACITY)),
            capacity,
        }
    }

    /// 末尾に追加し、上限を超えた分を先頭から破棄する
    pub fn append(&mut self, event: ChatEvent) {
        self.events.push_back(event);
        while self.events.len() > self.capacity {
            self.events.pop_front();
        }
    }

    /// 直近 `n` 件を古い順に返す
    pub fn recent(&self, n: usize) -> Vec<ChatEvent> {
        let skip = self.events.len().saturating_sub(n);
        self.events.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Default for ChatHistoryLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChatText, DisplayName, Timestamp};

    fn chat(i: i64) -> ChatEvent {
        ChatEvent::chat(
            &DisplayName::parse("alice").unwrap(),
            ChatText::parse(&format!("message {}", i)).unwrap(),
            Timestamp::new(i),
        )
    }

    #[test]
    fn test_append_never_exceeds_capacity() {
        // テスト項目: 何件追加しても 1000 件を超えない
        // given (前提条件):
        let mut log = ChatHistoryLog::new();

        // when (操作):
        for i in 0..2500 {
            log.append(chat(i));
        }

        // then (期待する結果):
        assert_eq!(log.len(), HISTORY_CAPACITY);
        let all = log.recent(usize::MAX);
        assert_eq!(all.first().unwrap().timestamp, Timestamp::new(1500));
        assert_eq!(all.last().unwrap().timestamp, Timestamp::new(2499));
    }

    #[test]
    fn test_recent_returns_last_entries_in_order() {
        // テスト項目: 直近 50 件が到着順で返される
        // given (前提条件):
        let mut log = ChatHistoryLog::new();
        for i in 0..120 {
            log.append(chat(i));
        }

        // when (操作):
        let recent = log.recent(REPLAY_LIMIT);

        // then (期待する結果):
        assert_eq!(recent.len(), 50);
        let timestamps: Vec<i64> = recent.iter().map(|e| e.timestamp.value()).collect();
        assert_eq!(timestamps, (70..120).collect::<Vec<i64>>());
    }

    #[test]
    fn test_recent_with_fewer_entries() {
        // テスト項目: 件数が少ない場合は全件が返される
        // given (前提条件):
        let mut log = ChatHistoryLog::new();
        log.append(chat(1));
        log.append(chat(2));

        // when (操作):
        let recent = log.recent(REPLAY_LIMIT);

        // then (期待する結果):
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].timestamp, Timestamp::new(1));
        assert_eq!(recent[1].timestamp, Timestamp::new(2));
    }

    #[test]
    fn test_small_capacity_evicts_oldest() {
        // テスト項目: 容量を超えると最も古いイベントが破棄される
        // given (前提条件):
        let mut log = ChatHistoryLog::with_capacity(2);

        // when (操作):
        log.append(chat(1));
        log.append(chat(2));
        log.append(chat(3));

        // then (期待する結果):
        let timestamps: Vec<i64> = log.recent(10).iter().map(|e| e.timestamp.value()).collect();
        assert_eq!(timestamps, vec![2, 3]);
    }
}
