//! Authorization flow handlers
//!
//! HTTP surface for obtaining a LINE Notify access token: a consent
//! redirect and the code-exchange callback. The router mounts these
//! routes under `/line_notify`.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::header::{CONTENT_TYPE, LOCATION};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Form, Router};
use serde::Deserialize;
use tracing::{info, warn};

use nr_core::{ErrorResponse, LineNotifyConfig};

use crate::error::ExchangeError;
use crate::oauth::{authorize_url, OAuthClient};

/// Shared state for the authorization flow handlers.
///
/// Credentials are injected at construction; handlers never read global
/// configuration.
pub struct AuthFlowState {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    pub oauth: OAuthClient,
}

impl AuthFlowState {
    pub fn new(config: &LineNotifyConfig, public_url: &str) -> Self {
        Self {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: callback_url(public_url),
            oauth: OAuthClient::new(),
        }
    }
}

/// Callback URL of this deployment, derived from its public base URL.
/// The same value is sent on both legs of the flow.
pub fn callback_url(public_url: &str) -> String {
    format!("{}/line_notify/callback", public_url.trim_end_matches('/'))
}

/// Callback parameters. `state` is accepted but not validated.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
}

/// Routes exposed by this channel
pub fn routes(state: Arc<AuthFlowState>) -> Router {
    Router::new()
        .route("/authorize", get(authorize))
        .route("/callback", get(callback_get).post(callback_post))
        .with_state(state)
}

fn misconfigured() -> ErrorResponse {
    ErrorResponse::new(
        "Server has not been properly configured.",
        StatusCode::NOT_IMPLEMENTED,
    )
}

/// GET /authorize
///
/// Redirects the user to the LINE Notify consent screen.
async fn authorize(State(state): State<Arc<AuthFlowState>>) -> Response {
    let Some(client_id) = state.client_id.as_deref() else {
        warn!("Authorize requested without a configured client_id");
        return misconfigured().into_response();
    };

    info!("Redirecting to LINE Notify consent screen");

    let url = authorize_url(client_id, &state.redirect_uri);
    (StatusCode::FOUND, [(LOCATION, url)]).into_response()
}

/// GET /callback — parameters in the query string
async fn callback_get(
    State(state): State<Arc<AuthFlowState>>,
    Query(params): Query<CallbackParams>,
) -> Response {
    complete_authorization(&state, params).await
}

/// POST /callback — form-encoded body; pure alias of the GET handler
async fn callback_post(
    State(state): State<Arc<AuthFlowState>>,
    Form(params): Form<CallbackParams>,
) -> Response {
    complete_authorization(&state, params).await
}

/// Exchange the received authorization code for an access token.
///
/// The token is returned to the caller as plain text; storing it against
/// a destination record is the caller's responsibility.
async fn complete_authorization(state: &AuthFlowState, params: CallbackParams) -> Response {
    let code = match params.code.as_deref().filter(|c| !c.is_empty()) {
        Some(code) => code,
        None => {
            return ErrorResponse::new("Authorization aborted.", StatusCode::UNAUTHORIZED)
                .into_response();
        }
    };

    // Credentials are checked before any outbound call
    let (Some(client_id), Some(client_secret)) =
        (state.client_id.as_deref(), state.client_secret.as_deref())
    else {
        warn!("Callback received without configured credentials");
        return misconfigured().into_response();
    };

    match state
        .oauth
        .exchange_code(code, &state.redirect_uri, client_id, client_secret)
        .await
    {
        Ok(token) => {
            info!("LINE Notify access token issued");
            (StatusCode::OK, [(CONTENT_TYPE, "text/plain")], token).into_response()
        }
        Err(ExchangeError::Rejected { status }) => {
            warn!("Token exchange rejected by LINE Notify: {}", status);
            ErrorResponse::new("Failed to request access token.", StatusCode::BAD_REQUEST)
                .into_response()
        }
        Err(ExchangeError::InvalidPayload) => ErrorResponse::new(
            "Received success response but contains invalid data from LINE Notify service.",
            StatusCode::BAD_GATEWAY,
        )
        .into_response(),
        Err(ExchangeError::Transport(e)) => {
            warn!("Token endpoint unreachable: {}", e);
            ErrorResponse::new(
                "Failed to reach LINE Notify service.",
                StatusCode::BAD_GATEWAY,
            )
            .into_response()
        }
    }
}
