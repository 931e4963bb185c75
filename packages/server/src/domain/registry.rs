//! 接続レジストリ
//!
//! ライブな接続と表示名の対応を管理する。表示名の一意性はこの構造体の
//! `bind` が唯一のチェックポイントであり、チェックと登録は 1 回の `&mut self`
//! 呼び出しの中で行われる。

use std::collections::HashMap;

use super::{
    error::RegistryError,
    value_object::{ConnectionId, DisplayName},
};

#[derive(Debug, Default, Clone)]
pub struct ConnectionRegistry {
    by_connection: HashMap<ConnectionId, DisplayName>,
    by_name: HashMap<DisplayName, ConnectionId>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 接続に表示名をバインドする
    ///
    /// 1 つの接続につき 1 度だけ成功する。
    pub fn bind(
        &mut self,
        connection: ConnectionId,
        name: DisplayName,
    ) -> Result<(), RegistryError> {
        if let Some(bound) = self.by_connection.get(&connection) {
            return Err(RegistryError::AlreadyBound(bound.as_str().to_string()));
        }
        if self.by_name.contains_key(&name) {
            return Err(RegistryError::NameTaken(name.into_string()));
        }

        self.by_name.insert(name.clone(), connection);
        self.by_connection.insert(connection, name);
        Ok(())
    }

    /// 接続のバインドを解除し、解放された表示名を返す
    pub fn unbind(&mut self, connection: &ConnectionId) -> Option<DisplayName> {
        let name = self.by_connection.remove(connection)?;
        self.by_name.remove(&name);
        Some(name)
    }

    pub fn is_bound(&self, connection: &ConnectionId) -> bool {
        self.by_connection.contains_key(connection)
    }

    pub fn name_of(&self, connection: &ConnectionId) -> Option<&DisplayName> {
        self.by_connection.get(connection)
    }

    /// 現在バインドされている全ての表示名（ソート済み）
    pub fn live_names(&self) -> Vec<DisplayName> {
        let mut names: Vec<DisplayName> = self.by_name.keys().cloned().collect();
        names.sort();
        names
    }

    /// 指定した接続以外にバインドされている表示名（ソート済み）
    pub fn names_except(&self, connection: &ConnectionId) -> Vec<DisplayName> {
        let mut names: Vec<DisplayName> = self
            .by_connection
            .iter()
            .filter(|(id, _)| *id != connection)
            .map(|(_, name)| name.clone())
            .collect();
        names.sort();
        names
    }
}
