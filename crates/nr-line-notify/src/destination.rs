//! LINE Notify delivery client
//!
//! Forwards a rendered notification to the LINE Notify API and relays
//! the provider's reply to the caller.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use nr_core::{NotificationDestination, NotificationSource, RelayedResponse};

use crate::error::LineNotifyError;

/// Message delivery endpoint
pub const NOTIFY_URL: &str = "https://notify-api.line.me/api/notify";

/// Sends notifications via the LINE Notify service.
#[derive(Debug, Clone)]
pub struct LineNotifyDestination {
    client: Client,
    notify_url: String,
}

impl LineNotifyDestination {
    /// Create a destination pointed at the production endpoint
    pub fn new() -> Self {
        Self::with_notify_url(NOTIFY_URL)
    }

    /// Create a destination with a custom endpoint
    pub fn with_notify_url(notify_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            notify_url: notify_url.into(),
        }
    }
}

impl Default for LineNotifyDestination {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationDestination for LineNotifyDestination {
    fn id(&self) -> &str {
        "line_notify"
    }

    /// One POST per call, no retries. The provider's status and body are
    /// relayed unchanged; the caller interprets non-2xx replies.
    async fn notify(
        &self,
        source: &dyn NotificationSource,
    ) -> nr_core::Result<RelayedResponse> {
        let token = source
            .authorization()
            .bearer_token()
            .ok_or(LineNotifyError::MissingToken)?;

        let response = self
            .client
            .post(&self.notify_url)
            .bearer_auth(token)
            .form(&[("message", source.to_text())])
            .send()
            .await
            .map_err(LineNotifyError::Http)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(LineNotifyError::Http)?;

        debug!("LINE Notify replied with {}", status);

        Ok(RelayedResponse::new(status, &headers, body))
    }
}
