//! nr-line-notify: LINE Notify channel for the notification router
//!
//! LINE Notify API を使用して通知を配信します。
//! OAuth2 認可フローと配信クライアントを実装します。

pub mod destination;
pub mod error;
pub mod handlers;
pub mod oauth;

pub use destination::LineNotifyDestination;
pub use error::{ExchangeError, LineNotifyError, Result};
pub use handlers::{routes, AuthFlowState};
