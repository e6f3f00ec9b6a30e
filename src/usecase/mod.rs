//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。

pub mod disconnect;
pub mod error;
pub mod login;
pub mod send_message;

pub use disconnect::DisconnectUseCase;
pub use error::SendMessageError;
pub use login::{LoginOutcome, LoginUseCase};
pub use send_message::{Routing, SendMessageUseCase};
