//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - メッセージ送信処理（永続化、配信先の決定）
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：配信前に永続化されること
//! - 永続化失敗時に配信が中止されることを保証
//! - ブロードキャスト／プライベートの配信先決定を確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：ブロードキャスト配信（送信者を含む全セッション）
//! - 正常系：プライベート配信（受信者がオンライン／オフライン）
//! - 異常系：History Store への書き込み失敗

use std::sync::Arc;

use crate::{
    domain::{HistoryStore, Message},
    registry::{SessionHandle, SessionRegistry},
};

use super::error::SendMessageError;

/// 配信先の決定結果
#[derive(Debug)]
pub enum Routing {
    /// ブロードキャスト：スナップショット内の全セッション（送信者を含む）
    Broadcast(Vec<(String, SessionHandle)>),
    /// プライベート：受信者のセッション（オフラインなら None）。
    /// 送信元接続へのエコーはハンドラ側が行う
    Private { receiver: Option<SessionHandle> },
}

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// 接続レジストリ
    registry: Arc<SessionRegistry>,
    /// History Store（データアクセス層の抽象化）
    history: Arc<dyn HistoryStore>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(registry: Arc<SessionRegistry>, history: Arc<dyn HistoryStore>) -> Self {
        Self { registry, history }
    }

    /// メッセージ送信を実行
    ///
    /// 配信先を計算する前に必ず永続化する。永続化に失敗した場合は
    /// エラーを返し、配信は行われない。
    ///
    /// # Arguments
    ///
    /// * `message` - 送信するメッセージ（Domain Model）
    ///
    /// # Returns
    ///
    /// * `Ok(Routing)` - 配信先の決定結果
    /// * `Err(SendMessageError)` - 永続化失敗
    pub async fn execute(&self, message: &Message) -> Result<Routing, SendMessageError> {
        // 1. 配信より先に永続化（クラッシュしても永続レコードは残る）
        self.history.save(message).await?;

        // 2. 配信先を決定
        let routing = match &message.receiver {
            Some(receiver) => Routing::Private {
                receiver: self.registry.get(receiver.as_str()).await,
            },
            None => Routing::Broadcast(self.registry.snapshot().await),
        };

        Ok(routing)
    }
}
