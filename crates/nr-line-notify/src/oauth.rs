//! LINE Notify OAuth2 client
//!
//! Implements the authorization-code grant against the fixed LINE Notify
//! endpoint set.

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ExchangeError;

/// Consent screen endpoint
pub const AUTHORIZE_URL: &str = "https://notify-bot.line.me/oauth/authorize";

/// Token exchange endpoint
pub const TOKEN_URL: &str = "https://notify-bot.line.me/oauth/token";

/// Build the consent URL for the authorization-code grant.
///
/// NOTE: `state` is sent empty, carried over from the deployed behavior.
/// An empty value disables the anti-replay protection the parameter
/// exists for; changing it is a pending product decision.
pub fn authorize_url(client_id: &str, redirect_uri: &str) -> String {
    format!(
        "{}?response_type=code&client_id={}&redirect_uri={}&scope=notify&state=&response_mode=form_post",
        AUTHORIZE_URL,
        urlencoding::encode(client_id),
        urlencoding::encode(redirect_uri),
    )
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Client for the token exchange leg of the flow
#[derive(Debug, Clone)]
pub struct OAuthClient {
    client: Client,
    token_url: String,
}

impl OAuthClient {
    /// Create a client pointed at the production token endpoint
    pub fn new() -> Self {
        Self::with_token_url(TOKEN_URL)
    }

    /// Create a client with a custom token endpoint
    pub fn with_token_url(token_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            token_url: token_url.into(),
        }
    }

    /// Exchange an authorization code for an access token.
    ///
    /// One synchronous POST, no retries; every failure is terminal and
    /// reported to the caller.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
        client_id: &str,
        client_secret: &str,
    ) -> std::result::Result<String, ExchangeError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("client_id", client_id),
            ("client_secret", client_secret),
        ];

        let response = self.client.post(&self.token_url).form(&params).send().await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            warn!("Token exchange rejected: {}", status);
            return Err(ExchangeError::Rejected { status });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|_| ExchangeError::InvalidPayload)?;

        debug!("Access token obtained");
        Ok(token.access_token)
    }
}

impl Default for OAuthClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_authorize_url_parameters() {
        let url = authorize_url("my-client", "https://example.com/line_notify/callback");

        assert!(url.starts_with(AUTHORIZE_URL));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("client_id=my-client"));
        assert!(url.contains("scope=notify"));
        assert!(url.contains("state=&"));
        assert!(url.contains("response_mode=form_post"));
        assert!(url.contains(
            "redirect_uri=https%3A%2F%2Fexample.com%2Fline_notify%2Fcallback"
        ));
    }

    #[tokio::test]
    async fn test_exchange_code_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=CODE"))
            .and(body_string_contains("client_id=id"))
            .and(body_string_contains("client_secret=secret"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"access_token": "T"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = OAuthClient::with_token_url(format!("{}/oauth/token", server.uri()));
        let token = client
            .exchange_code("CODE", "https://example.com/cb", "id", "secret")
            .await
            .unwrap();

        assert_eq!(token, "T");
    }

    #[tokio::test]
    async fn test_exchange_code_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = OAuthClient::with_token_url(server.uri());
        let err = client
            .exchange_code("CODE", "https://example.com/cb", "id", "secret")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ExchangeError::Rejected { status } if status == reqwest::StatusCode::FORBIDDEN
        ));
    }

    #[tokio::test]
    async fn test_exchange_code_missing_access_token() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": 200})),
            )
            .mount(&server)
            .await;

        let client = OAuthClient::with_token_url(server.uri());
        let err = client
            .exchange_code("CODE", "https://example.com/cb", "id", "secret")
            .await
            .unwrap_err();

        assert!(matches!(err, ExchangeError::InvalidPayload));
    }

    #[tokio::test]
    async fn test_exchange_code_non_json_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = OAuthClient::with_token_url(server.uri());
        let err = client
            .exchange_code("CODE", "https://example.com/cb", "id", "secret")
            .await
            .unwrap_err();

        assert!(matches!(err, ExchangeError::InvalidPayload));
    }
}
