//! InMemory History Store 実装
//!
//! ドメイン層が定義する HistoryStore trait の具体的な実装。
//! Vec を追記専用ログとして使用し、保存順 = クエリ結果の順序になります。
//! MySQL などの DBMS を実装する場合もこの trait を実装します。

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{HistoryStore, Message, StoreError, Username};

/// インメモリ History Store 実装
///
/// Vec を追記専用ログとして使用する実装。
/// ドメイン層の HistoryStore trait を実装します（依存性の逆転）。
#[derive(Debug, Default)]
pub struct InMemoryHistoryStore {
    /// 保存順のメッセージログ
    messages: Mutex<Vec<Message>>,
}

impl InMemoryHistoryStore {
    /// 新しい InMemoryHistoryStore を作成
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
        }
    }

    /// 保存済みメッセージ数を取得
    pub async fn len(&self) -> usize {
        let messages = self.messages.lock().await;
        messages.len()
    }

    /// 保存済みメッセージが無いかどうか
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn save(&self, message: &Message) -> Result<(), StoreError> {
        let mut messages = self.messages.lock().await;
        messages.push(message.clone());
        Ok(())
    }

    async fn query(&self, username: &Username) -> Result<Vec<Message>, StoreError> {
        let messages = self.messages.lock().await;
        Ok(messages
            .iter()
            .filter(|message| message.concerns(username))
            .cloned()
            .collect())
    }
}
