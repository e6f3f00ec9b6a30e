//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::StoreError;

/// メッセージ送信処理のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    /// 永続化失敗。配信は中止され、送信者にエラーフレームで通知される
    #[error("failed to persist message: {0}")]
    Persistence(#[from] StoreError),
}
