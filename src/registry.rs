//! Session registry: the authoritative mapping of username to live connection.
//!
//! This is the only mutable state shared across connection handler tasks.
//! All mutation goes through [`SessionRegistry::register`] and
//! [`SessionRegistry::deregister`], which are atomic with respect to each
//! other under the registry mutex. Broadcast paths work on a point-in-time
//! [`SessionRegistry::snapshot`] so that no network I/O ever happens while
//! the lock is held.

use std::collections::HashMap;

use tokio::sync::{Mutex, mpsc};
use uuid::Uuid;

/// Outbound channel of one connection's send pump.
///
/// Unbounded, so a per-recipient send never blocks on the recipient's
/// transport; a slow client cannot stall a sender or a broadcast.
pub type OutboundTx = mpsc::UnboundedSender<String>;

/// Live binding between a username and one active connection.
///
/// `conn_id` is generated when the transport is accepted and never reused,
/// so a superseded connection can be told apart from its replacement during
/// teardown.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    /// Identity of the underlying connection
    pub conn_id: Uuid,
    /// Channel feeding the connection's send pump
    pub tx: OutboundTx,
}

impl SessionHandle {
    /// Create a handle with a fresh connection identity.
    pub fn new(tx: OutboundTx) -> Self {
        Self {
            conn_id: Uuid::new_v4(),
            tx,
        }
    }
}

/// Shared mapping from username to active session.
///
/// Invariant: at most one entry per username at any instant. An entry being
/// present is what "the session is Active" means; entries are added on login
/// and removed on confirmed disconnect.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, SessionHandle>>,
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Insert or replace the session for `username`.
    ///
    /// Returns `true` only when no prior entry existed (a new login).
    /// A reconnect swaps the connection handle in place and returns `false`;
    /// the caller must not announce it as a join.
    pub async fn register(&self, username: &str, handle: SessionHandle) -> bool {
        let mut sessions = self.sessions.lock().await;
        sessions.insert(username.to_string(), handle).is_none()
    }

    /// Remove the session for `username` only if the registered connection
    /// is the one identified by `conn_id`.
    ///
    /// Returns whether removal occurred. A stale teardown (the entry was
    /// already replaced by a reconnect) is a contractual no-op, not an error.
    pub async fn deregister(&self, username: &str, conn_id: Uuid) -> bool {
        let mut sessions = self.sessions.lock().await;
        let is_registered = sessions
            .get(username)
            .is_some_and(|handle| handle.conn_id == conn_id);
        if is_registered {
            sessions.remove(username);
        }
        is_registered
    }

    /// Current session for `username`, if one is registered.
    pub async fn get(&self, username: &str) -> Option<SessionHandle> {
        let sessions = self.sessions.lock().await;
        sessions.get(username).cloned()
    }

    /// Point-in-time copy of all sessions, sorted by username.
    ///
    /// The lock is released before the copy is returned; fan-out I/O must
    /// iterate this snapshot, never the live map.
    pub async fn snapshot(&self) -> Vec<(String, SessionHandle)> {
        let sessions = self.sessions.lock().await;
        let mut entries: Vec<(String, SessionHandle)> = sessions
            .iter()
            .map(|(name, handle)| (name.clone(), handle.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// All registered usernames, sorted for deterministic wire output.
    pub async fn usernames(&self) -> Vec<String> {
        let sessions = self.sessions.lock().await;
        let mut names: Vec<String> = sessions.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered sessions.
    pub async fn len(&self) -> usize {
        let sessions = self.sessions.lock().await;
        sessions.len()
    }

    /// Whether no session is registered.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle() -> SessionHandle {
        let (tx, _rx) = mpsc::unbounded_channel();
        SessionHandle::new(tx)
    }

    #[tokio::test]
    async fn test_register_new_login() {
        // テスト項目: 未登録のユーザー名の登録は新規ログインとして扱われる
        // given (前提条件):
        let registry = SessionRegistry::new();

        // when (操作):
        let is_new_login = registry.register("alice", handle()).await;

        // then (期待する結果):
        assert!(is_new_login);
        assert_eq!(registry.len().await, 1);
        assert!(registry.get("alice").await.is_some());
    }

    #[tokio::test]
    async fn test_register_reconnect_replaces_handle() {
        // テスト項目: 同一ユーザー名の再登録は接続を差し替え、新規ログインにならない
        // given (前提条件):
        let registry = SessionRegistry::new();
        let first = handle();
        let second = handle();
        let second_conn_id = second.conn_id;
        registry.register("alice", first).await;

        // when (操作):
        let is_new_login = registry.register("alice", second).await;

        // then (期待する結果): エントリは1つのまま、接続が差し替わっている
        assert!(!is_new_login);
        assert_eq!(registry.len().await, 1);
        assert_eq!(registry.get("alice").await.unwrap().conn_id, second_conn_id);
    }

    #[tokio::test]
    async fn test_at_most_one_entry_per_username() {
        // テスト項目: 何度登録してもユーザー名ごとのエントリは最大1つ
        // given (前提条件):
        let registry = SessionRegistry::new();

        // when (操作):
        for _ in 0..5 {
            registry.register("alice", handle()).await;
        }
        registry.register("bob", handle()).await;

        // then (期待する結果):
        assert_eq!(registry.len().await, 2);
        assert_eq!(registry.usernames().await, vec!["alice", "bob"]);
    }

    #[tokio::test]
    async fn test_deregister_matching_connection() {
        // テスト項目: 登録中の接続と一致する場合のみエントリが削除される
        // given (前提条件):
        let registry = SessionRegistry::new();
        let session = handle();
        let conn_id = session.conn_id;
        registry.register("alice", session).await;

        // when (操作):
        let removed = registry.deregister("alice", conn_id).await;

        // then (期待する結果):
        assert!(removed);
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_deregister_stale_connection_is_noop() {
        // テスト項目: 再接続で置き換えられた古い接続の解除は no-op になる
        // given (前提条件):
        let registry = SessionRegistry::new();
        let old = handle();
        let old_conn_id = old.conn_id;
        registry.register("alice", old).await;

        let new = handle();
        let new_conn_id = new.conn_id;
        registry.register("alice", new).await;

        // when (操作): 古い接続の teardown が解除を試みる
        let removed = registry.deregister("alice", old_conn_id).await;

        // then (期待する結果): 新しいセッションはそのまま残る
        assert!(!removed);
        assert_eq!(registry.get("alice").await.unwrap().conn_id, new_conn_id);
    }

    #[tokio::test]
    async fn test_deregister_unknown_username_is_noop() {
        // テスト項目: 未登録のユーザー名の解除は no-op になる
        // given (前提条件):
        let registry = SessionRegistry::new();

        // when (操作):
        let removed = registry.deregister("ghost", Uuid::new_v4()).await;

        // then (期待する結果):
        assert!(!removed);
    }

    #[tokio::test]
    async fn test_snapshot_sorted_by_username() {
        // テスト項目: スナップショットはユーザー名順にソートされる
        // given (前提条件):
        let registry = SessionRegistry::new();
        registry.register("charlie", handle()).await;
        registry.register("alice", handle()).await;
        registry.register("bob", handle()).await;

        // when (操作):
        let snapshot = registry.snapshot().await;

        // then (期待する結果):
        let names: Vec<&str> = snapshot.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob", "charlie"]);
    }

    #[tokio::test]
    async fn test_concurrent_registers_keep_single_entry() {
        // テスト項目: 並行した登録が競合してもユーザー名ごとのエントリは1つ
        // given (前提条件):
        let registry = std::sync::Arc::new(SessionRegistry::new());

        // when (操作): 同じユーザー名への登録を並行実行
        let mut tasks = Vec::new();
        for _ in 0..16 {
            let registry = registry.clone();
            tasks.push(tokio::spawn(async move {
                registry.register("alice", handle()).await
            }));
        }
        let mut new_logins = 0;
        for task in tasks {
            if task.await.unwrap() {
                new_logins += 1;
            }
        }

        // then (期待する結果): 新規ログイン判定はちょうど1回、エントリは1つ
        assert_eq!(new_logins, 1);
        assert_eq!(registry.len().await, 1);
    }
}
