//! 入力中（typing）状態
//!
//! サーバーはクライアントからの開始・終了通知を中継するだけで、タイムアウトは
//! 持たない。永続化されず、再起動時は空になる。

use std::collections::BTreeSet;

use super::value_object::DisplayName;

#[derive(Debug, Default, Clone)]
pub struct TypingPresence {
    typing: BTreeSet<DisplayName>,
}

impl TypingPresence {
    pub fn new() -> Self {
        Self::default()
    }

    /// 入力中状態を設定する。状態が変化した場合に `true` を返す
    pub fn set(&mut self, name: DisplayName, typing: bool) -> bool {
        if typing {
            self.typing.insert(name)
        } else {
            self.typing.remove(&name)
        }
    }

    /// 切断時などに入力中状態を消去する
    pub fn clear(&mut self, name: &DisplayName) -> bool {
        self.typing.remove(name)
    }

    pub fn names(&self) -> Vec<DisplayName> {
        self.typing.iter().cloned().collect()
    }
}
