//! エラー型定義 (nr-line-notify)

use thiserror::Error;

/// Outcome of a failed token exchange
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// The token endpoint answered with something other than 200
    #[error("token endpoint rejected the exchange: {status}")]
    Rejected { status: reqwest::StatusCode },

    /// A 200 reply whose body is not JSON or lacks `access_token`
    #[error("success response contained invalid data")]
    InvalidPayload,

    /// The token endpoint could not be reached
    #[error("failed to reach token endpoint: {0}")]
    Transport(#[from] reqwest::Error),
}

/// nr-line-notify のエラー型
#[derive(Error, Debug)]
pub enum LineNotifyError {
    #[error("notification source carries no token")]
    MissingToken,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("token exchange failed: {0}")]
    Exchange(#[from] ExchangeError),
}

impl From<LineNotifyError> for nr_core::Error {
    fn from(e: LineNotifyError) -> Self {
        nr_core::Error::Delivery(e.to_string())
    }
}

/// Result 型エイリアス
pub type Result<T> = std::result::Result<T, LineNotifyError>;
