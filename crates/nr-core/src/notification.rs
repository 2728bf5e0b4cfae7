//! Notification capability contracts
//!
//! Defines the source/destination contracts every delivery channel
//! implements, and the registry the router dispatches through.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::response::RelayedResponse;

/// Credentials attached to a notification source.
///
/// A destination extracts exactly one bearer token per call:
/// a non-empty `token` wins, otherwise the `password` parameter is used
/// as a fallback. Empty strings are treated as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Authorization {
    /// Provider-issued bearer token, if the destination record holds one
    pub token: Option<String>,

    /// Free-form credential parameters; `password` doubles as a token
    /// fallback for channels that authenticate with a single secret
    #[serde(default)]
    pub parameters: HashMap<String, String>,
}

impl Authorization {
    /// Resolve the bearer token with the documented precedence:
    /// `token`, then `parameters["password"]`.
    pub fn bearer_token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .filter(|t| !t.is_empty())
            .or_else(|| {
                self.parameters
                    .get("password")
                    .map(String::as_str)
                    .filter(|p| !p.is_empty())
            })
    }
}

/// A renderable notification message plus its credentials.
pub trait NotificationSource: Send + Sync {
    /// Credentials for the destination this message is addressed to
    fn authorization(&self) -> &Authorization;

    /// Render the outgoing message body
    fn to_text(&self) -> String;
}

/// A notification source that has already been rendered to text.
///
/// Used by the dispatch endpoint and by tests.
#[derive(Debug, Clone)]
pub struct RenderedSource {
    text: String,
    authorization: Authorization,
}

impl RenderedSource {
    pub fn new(text: impl Into<String>, authorization: Authorization) -> Self {
        Self {
            text: text.into(),
            authorization,
        }
    }
}

impl NotificationSource for RenderedSource {
    fn authorization(&self) -> &Authorization {
        &self.authorization
    }

    fn to_text(&self) -> String {
        self.text.clone()
    }
}

/// A delivery channel. Each provider implements this.
///
/// Implementations are stateless aside from immutable configuration:
/// they never persist or cache the token they extract from a source.
#[async_trait]
pub trait NotificationDestination: Send + Sync {
    /// Destination identifier (e.g. "line_notify")
    fn id(&self) -> &str;

    /// Forward the rendered message to the provider.
    ///
    /// The provider's reply is relayed to the caller as-is; delivery
    /// failures are not classified here. Exactly one outbound call per
    /// invocation, no retries.
    async fn notify(&self, source: &dyn NotificationSource) -> crate::Result<RelayedResponse>;
}

/// Router table of destinations keyed by destination id.
#[derive(Default)]
pub struct DestinationRegistry {
    destinations: HashMap<String, Arc<dyn NotificationDestination>>,
}

impl DestinationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a destination under its own id
    pub fn register(&mut self, destination: Arc<dyn NotificationDestination>) {
        self.destinations
            .insert(destination.id().to_string(), destination);
    }

    /// Look up a destination by id
    pub fn get(&self, id: &str) -> Option<Arc<dyn NotificationDestination>> {
        self.destinations.get(id).cloned()
    }

    /// Registered destination ids
    pub fn ids(&self) -> Vec<&str> {
        self.destinations.keys().map(String::as_str).collect()
    }
}
