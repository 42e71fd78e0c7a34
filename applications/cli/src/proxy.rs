//! Local CORS proxy in front of a function-runtime emulator.
//!
//! Browsers cannot call the emulator directly because it sends no CORS
//! headers. Every POST is forwarded to the target URL as is and the answer is
//! handed back with permissive CORS headers attached.

use crate::config::ProxySettings;
use crate::error::{CliError, Result};
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Clone)]
pub struct ProxyState {
    http: reqwest::Client,
    target: Arc<str>,
}

impl ProxyState {
    pub fn new(target: impl Into<Arc<str>>) -> Self {
        Self {
            http: reqwest::Client::new(),
            target: target.into(),
        }
    }
}

/// Router that forwards POSTs on any path to `target`.
pub fn router(target: impl Into<Arc<str>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::OPTIONS, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/", post(forward).options(preflight))
        .route("/*path", post(forward).options(preflight))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(ProxyState::new(target))
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn forward(State(state): State<ProxyState>, headers: HeaderMap, body: Bytes) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or(JSON_CONTENT_TYPE)
        .to_string();

    let upstream = state
        .http
        .post(state.target.as_ref())
        .header("Content-Type", content_type)
        .body(body.to_vec())
        .send()
        .await;

    let upstream = match upstream {
        Ok(response) => response,
        Err(e) => return proxy_error(e),
    };

    let status = upstream.status();
    // Error answers are always labelled as JSON, successful ones keep the upstream type.
    let upstream_type = if status.is_success() {
        upstream
            .headers()
            .get("Content-Type")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    } else {
        Some(JSON_CONTENT_TYPE.to_string())
    };

    let bytes = match upstream.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => return proxy_error(e),
    };

    tracing::debug!(status = status.as_u16(), len = bytes.len(), "Forwarded request");

    let status = StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut response = Response::new(Body::from(bytes.to_vec()));
    *response.status_mut() = status;
    if let Some(value) = upstream_type.and_then(|t| HeaderValue::from_str(&t).ok()) {
        response.headers_mut().insert(header::CONTENT_TYPE, value);
    }
    response
}

fn proxy_error(error: impl std::fmt::Display) -> Response {
    tracing::warn!(error = %error, "Upstream request failed");
    (
        StatusCode::BAD_GATEWAY,
        [(header::CONTENT_TYPE, "text/plain")],
        format!("Proxy error: {}", error),
    )
        .into_response()
}

/// Bind the listening socket. `host` may be a name such as `localhost`.
pub async fn bind(settings: &ProxySettings) -> Result<TcpListener> {
    TcpListener::bind((settings.host.as_str(), settings.port))
        .await
        .map_err(|e| {
            CliError::Proxy(format!(
                "Cannot listen on {}:{}: {}",
                settings.host, settings.port, e
            ))
        })
}

/// Listen on the configured address until the process is stopped.
pub async fn serve(settings: &ProxySettings) -> Result<()> {
    let listener = bind(settings).await?;
    tracing::info!(
        "Local CORS proxy listening on http://{} -> {}",
        listener.local_addr()?,
        settings.target_url
    );

    axum::serve(listener, router(settings.target_url.as_str()))
        .await
        .map_err(|e| CliError::Proxy(e.to_string()))
}
