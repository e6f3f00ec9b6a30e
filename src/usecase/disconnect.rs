//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectUseCase::execute() メソッド
//! - 切断処理（接続一致チェック付きのレジストリ解除）
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：登録中の接続のみがエントリを削除できる
//! - 再接続後に古い接続の teardown が新しいセッションを消さないことを保証
//! - 離脱ブロードキャストの要否判定（戻り値）を確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：登録中の接続の切断
//! - エッジケース：再接続に置き換えられた古い接続の切断（no-op）

use std::sync::Arc;

use uuid::Uuid;

use crate::registry::SessionRegistry;

/// 切断のユースケース
pub struct DisconnectUseCase {
    /// 接続レジストリ
    registry: Arc<SessionRegistry>,
}

impl DisconnectUseCase {
    /// 新しい DisconnectUseCase を作成
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    /// 切断を実行
    ///
    /// # Arguments
    ///
    /// * `username` - 切断するユーザー名
    /// * `conn_id` - teardown 中の接続の識別子
    ///
    /// # Returns
    ///
    /// エントリが削除されたかどうか。`true` の場合のみ呼び出し側は
    /// `user_leave` と `online_users` をブロードキャストする。
    pub async fn execute(&self, username: &str, conn_id: Uuid) -> bool {
        let removed = self.registry.deregister(username, conn_id).await;
        if removed {
            tracing::info!("'{}' deregistered", username);
        } else {
            tracing::debug!(
                "Stale teardown for '{}' ignored (connection already superseded)",
                username
            );
        }
        removed
    }
}
