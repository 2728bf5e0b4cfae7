//! HTTP server for the notification router
//!
//! Mounts the channel routes and the dispatch endpoint.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use nr_core::{Authorization, Config, DestinationRegistry, ErrorResponse, RenderedSource};
use nr_line_notify::{AuthFlowState, LineNotifyDestination};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<DestinationRegistry>,
}

/// Dispatch request payload: an already rendered message plus the
/// credentials the caller stored against the destination record.
#[derive(Debug, Deserialize)]
pub struct NotifyRequest {
    pub message: String,
    pub token: Option<String>,
    #[serde(default)]
    pub parameters: HashMap<String, String>,
}

/// Build the application router.
///
/// Channel HTTP surfaces are nested under their destination id; the
/// LINE Notify authorization flow lives under `/line_notify`.
pub fn build_router(config: &Config) -> Router {
    let mut registry = DestinationRegistry::new();
    registry.register(Arc::new(LineNotifyDestination::new()));

    let auth_flow = Arc::new(AuthFlowState::new(
        &config.line_notify,
        &config.server.public_url,
    ));

    let state = AppState {
        registry: Arc::new(registry),
    };

    Router::new()
        .route("/health", get(health))
        .route("/notify/{destination}", post(dispatch))
        .with_state(state)
        .nest("/line_notify", nr_line_notify::routes(auth_flow))
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server
pub async fn start_server(config: Config) -> anyhow::Result<()> {
    let app = build_router(&config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Notification router listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down...");
        })
        .await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> &'static str {
    "OK"
}

/// Forward a rendered message to one destination and relay the
/// provider's reply unchanged.
async fn dispatch(
    State(state): State<AppState>,
    Path(destination): Path<String>,
    Json(req): Json<NotifyRequest>,
) -> Response {
    let Some(dest) = state.registry.get(&destination) else {
        return ErrorResponse::new(
            format!("Unknown destination: {}", destination),
            StatusCode::NOT_FOUND,
        )
        .into_response();
    };

    let source = RenderedSource::new(
        req.message,
        Authorization {
            token: req.token,
            parameters: req.parameters,
        },
    );

    match dest.notify(&source).await {
        Ok(relayed) => relayed.into_response(),
        Err(e) => {
            error!("Delivery to {} failed: {}", destination, e);
            ErrorResponse::new(e.to_string(), StatusCode::BAD_GATEWAY).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(token: Option<&str>) -> NotifyRequest {
        NotifyRequest {
            message: "deploy finished".to_string(),
            token: token.map(str::to_string),
            parameters: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn test_health() {
        assert_eq!(health().await, "OK");
    }

    #[tokio::test]
    async fn test_dispatch_unknown_destination() {
        let state = AppState {
            registry: Arc::new(DestinationRegistry::new()),
        };

        let response = dispatch(
            State(state),
            Path("nowhere".to_string()),
            Json(request(Some("t"))),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "Unknown destination: nowhere");
    }

    #[tokio::test]
    async fn test_dispatch_relays_provider_reply() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(header("authorization", "Bearer abc"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"status":200,"message":"ok"}"#)
                    .insert_header("content-type", "application/json")
                    .insert_header("x-ratelimit-remaining", "999"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut registry = DestinationRegistry::new();
        registry.register(Arc::new(LineNotifyDestination::with_notify_url(
            server.uri(),
        )));
        let state = AppState {
            registry: Arc::new(registry),
        };

        let response = dispatch(
            State(state),
            Path("line_notify".to_string()),
            Json(request(Some("abc"))),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-ratelimit-remaining"));
    }

    #[tokio::test]
    async fn test_dispatch_missing_token() {
        let mut registry = DestinationRegistry::new();
        registry.register(Arc::new(LineNotifyDestination::with_notify_url(
            "http://unused.invalid",
        )));
        let state = AppState {
            registry: Arc::new(registry),
        };

        let response = dispatch(
            State(state),
            Path("line_notify".to_string()),
            Json(request(None)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
