//! Wire shapes for the two invocation targets.
//!
//! A local function-runtime emulator expects the full event envelope (headers
//! plus a JSON-encoded body); a deployed function URL or gateway expects the raw
//! payload with the `Authorization` header attached directly.

use crate::error::Result;
use crate::payload::RequestPayload;
use serde::Serialize;

/// Path segment that marks a local function-runtime emulator endpoint.
pub const LOCAL_INVOKE_PATH: &str = "/2015-03-31/functions/function/invocations";

/// Endpoint used when local mode is switched on.
pub const LOCAL_INVOKE_URL: &str =
    "http://127.0.0.1:8787/2015-03-31/functions/function/invocations";

const BEARER_PREFIX: &str = "Bearer ";

/// Which envelope the request is wrapped in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InvocationMode {
    Local,
    Direct,
}

impl InvocationMode {
    /// Local when the toggle is on or the endpoint points at the emulator path.
    pub fn detect(endpoint: &str, local_toggle: bool) -> Self {
        if local_toggle || endpoint.contains(LOCAL_INVOKE_PATH) {
            InvocationMode::Local
        } else {
            InvocationMode::Direct
        }
    }
}

/// `Authorization` value for a token, or `None` when there is no token.
///
/// A token that already carries the `Bearer ` prefix is passed through as is.
pub fn authorization_header(token: &str) -> Option<String> {
    let token = token.trim();
    if token.is_empty() {
        None
    } else if token.starts_with(BEARER_PREFIX) {
        Some(token.to_string())
    } else {
        Some(format!("{}{}", BEARER_PREFIX, token))
    }
}

#[derive(Debug, Serialize)]
struct EventHeaders<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    authorization: Option<&'a str>,
}

/// Event shape the local emulator hands to the function.
#[derive(Debug, Serialize)]
struct LocalEvent<'a> {
    headers: EventHeaders<'a>,
    body: String,
    #[serde(rename = "isBase64Encoded")]
    is_base64_encoded: bool,
}

/// A fully shaped request, ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreparedRequest {
    pub url: String,
    pub mode: InvocationMode,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl PreparedRequest {
    /// Headers with any credential replaced, for display.
    pub fn redacted_headers(&self) -> Vec<(String, String)> {
        self.headers
            .iter()
            .map(|(name, value)| {
                if name.eq_ignore_ascii_case("authorization") {
                    (name.clone(), "Bearer ***".to_string())
                } else {
                    (name.clone(), value.clone())
                }
            })
            .collect()
    }
}

/// Wrap the payload for `endpoint`.
pub fn build_request(
    endpoint: &str,
    payload: &RequestPayload,
    auth_header: Option<&str>,
    local_toggle: bool,
) -> Result<PreparedRequest> {
    let mode = InvocationMode::detect(endpoint, local_toggle);
    let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];

    let body = match mode {
        InvocationMode::Local => serde_json::to_string(&LocalEvent {
            headers: EventHeaders {
                authorization: auth_header,
            },
            body: payload.to_json()?,
            is_base64_encoded: false,
        })?,
        InvocationMode::Direct => {
            if let Some(auth) = auth_header {
                headers.push(("Authorization".to_string(), auth.to_string()));
            }
            payload.to_json()?
        }
    };

    Ok(PreparedRequest {
        url: endpoint.to_string(),
        mode,
        headers,
        body,
    })
}
