//! nr-core: Notification Router Core Library
//!
//! 通知ルーターの共有型を提供します。
//! 設定、エラー型、通知の送信元/送信先コントラクトと
//! レスポンス型のコア機能を提供します。

pub mod config;
pub mod error;
pub mod notification;
pub mod response;

pub use config::{Config, LineNotifyConfig, ServerConfig};
pub use error::{Error, Result};
pub use notification::{
    Authorization, DestinationRegistry, NotificationDestination, NotificationSource,
    RenderedSource,
};
pub use response::{ErrorResponse, RelayedResponse};
