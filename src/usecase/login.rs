//! UseCase: ログイン処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LoginUseCase::execute() メソッド
//! - ログイン処理（新規ログイン判定、履歴の取得）
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：再接続が新規ログインとして扱われないこと
//! - 履歴が保存順で返されることを保証
//! - 履歴クエリ失敗時もログイン自体は成立することを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ログインと履歴リプレイ
//! - 正常系：再接続（接続差し替え）
//! - 異常系：履歴ストアのクエリ失敗

use std::sync::Arc;

use crate::{
    domain::{HistoryStore, Message, Username},
    registry::{SessionHandle, SessionRegistry},
};

/// ログイン処理の結果
#[derive(Debug)]
pub struct LoginOutcome {
    /// 新規ログインかどうか（再接続の場合は false）
    pub is_new_login: bool,
    /// このユーザーに関連する履歴（保存順）
    pub history: Vec<Message>,
}

/// ログインのユースケース
pub struct LoginUseCase {
    /// 接続レジストリ
    registry: Arc<SessionRegistry>,
    /// History Store（データアクセス層の抽象化）
    history: Arc<dyn HistoryStore>,
}

impl LoginUseCase {
    /// 新しい LoginUseCase を作成
    pub fn new(registry: Arc<SessionRegistry>, history: Arc<dyn HistoryStore>) -> Self {
        Self { registry, history }
    }

    /// ログインを実行
    ///
    /// # Arguments
    ///
    /// * `username` - ログインするユーザー名（Domain Model）
    /// * `handle` - この接続のセッションハンドル
    ///
    /// # Returns
    ///
    /// 新規ログイン判定とリプレイ対象の履歴。履歴クエリの失敗は
    /// ログ出力のうえ空のリプレイに縮退し、ログイン自体は成立する。
    pub async fn execute(&self, username: &Username, handle: SessionHandle) -> LoginOutcome {
        // 1. レジストリに登録（既存エントリがあれば接続を差し替え）
        let is_new_login = self.registry.register(username.as_str(), handle).await;

        // 2. 関連する履歴を取得
        let history = match self.history.query(username).await {
            Ok(messages) => messages,
            Err(e) => {
                tracing::warn!("History query for '{}' failed: {}", username, e);
                Vec::new()
            }
        };

        LoginOutcome {
            is_new_login,
            history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MessageContent, MockHistoryStore, StoreError},
        infrastructure::repository::InMemoryHistoryStore,
    };
    use tokio::sync::mpsc;

    fn handle() -> SessionHandle {
        let (tx, _rx) = mpsc::unbounded_channel();
        SessionHandle::new(tx)
    }

    fn username(name: &str) -> Username {
        Username::new(name.to_string()).unwrap()
    }

    fn message(sender: &str, content: &str, receiver: Option<&str>) -> Message {
        Message::new(
            username(sender),
            MessageContent::new(content.to_string()).unwrap(),
            receiver.map(username),
        )
    }

    #[tokio::test]
    async fn test_login_new_user() {
        // テスト項目: 初回ログインが新規ログインとして扱われる
        // given (前提条件):
        let registry = Arc::new(SessionRegistry::new());
        let history = Arc::new(InMemoryHistoryStore::new());
        let usecase = LoginUseCase::new(registry.clone(), history);

        // when (操作):
        let outcome = usecase.execute(&username("alice"), handle()).await;

        // then (期待する結果):
        assert!(outcome.is_new_login);
        assert!(outcome.history.is_empty());
        assert_eq!(registry.usernames().await, vec!["alice"]);
    }

    #[tokio::test]
    async fn test_login_reconnect_is_not_new() {
        // テスト項目: 再接続は新規ログインにならず、接続が差し替わる
        // given (前提条件):
        let registry = Arc::new(SessionRegistry::new());
        let history = Arc::new(InMemoryHistoryStore::new());
        let usecase = LoginUseCase::new(registry.clone(), history);
        usecase.execute(&username("alice"), handle()).await;

        let replacement = handle();
        let replacement_conn_id = replacement.conn_id;

        // when (操作):
        let outcome = usecase.execute(&username("alice"), replacement).await;

        // then (期待する結果):
        assert!(!outcome.is_new_login);
        assert_eq!(registry.len().await, 1);
        assert_eq!(
            registry.get("alice").await.unwrap().conn_id,
            replacement_conn_id
        );
    }

    #[tokio::test]
    async fn test_login_replays_relevant_history_in_order() {
        // テスト項目: ログイン時に関連する履歴が保存順で返される
        // given (前提条件):
        let registry = Arc::new(SessionRegistry::new());
        let history = Arc::new(InMemoryHistoryStore::new());
        history.save(&message("alice", "hi all", None)).await.unwrap();
        history
            .save(&message("alice", "psst", Some("bob")))
            .await
            .unwrap();
        history
            .save(&message("carol", "hidden", Some("dave")))
            .await
            .unwrap();
        let usecase = LoginUseCase::new(registry, history);

        // when (操作): bob がログイン
        let outcome = usecase.execute(&username("bob"), handle()).await;

        // then (期待する結果): ブロードキャストと bob 宛のみ、保存順
        assert_eq!(outcome.history.len(), 2);
        assert_eq!(outcome.history[0].content.as_str(), "hi all");
        assert_eq!(outcome.history[1].content.as_str(), "psst");
    }

    #[tokio::test]
    async fn test_login_survives_history_query_failure() {
        // テスト項目: 履歴クエリ失敗時も登録は成立し、リプレイは空になる
        // given (前提条件):
        let registry = Arc::new(SessionRegistry::new());
        let mut store = MockHistoryStore::new();
        store
            .expect_query()
            .returning(|_| Err(StoreError::QueryFailed("connection refused".to_string())));
        let usecase = LoginUseCase::new(registry.clone(), Arc::new(store));

        // when (操作):
        let outcome = usecase.execute(&username("alice"), handle()).await;

        // then (期待する結果):
        assert!(outcome.is_new_login);
        assert!(outcome.history.is_empty());
        assert!(registry.get("alice").await.is_some());
    }
}
