//! HTTP transport for the playlist function.

use crate::error::{ClientError, Result};
use async_trait::async_trait;
use gigset_core::{PreparedRequest, ResponseEnvelope};
use reqwest::Client;
use tracing::{debug, info};

/// Sends one prepared request and decodes whatever comes back.
#[async_trait]
pub trait Invoke: Send + Sync {
    async fn invoke(&self, request: &PreparedRequest) -> Result<ResponseEnvelope>;
}

/// Client for the setlist playlist function.
///
/// There is no request timeout and no retry: a request resolves, fails, or
/// keeps the submission pending until it does.
///
/// # Example
///
/// ```ignore
/// use gigset_client::{Invoke, SetlistClient};
/// use gigset_core::{build_payload, build_request, FormValues};
///
/// let client = SetlistClient::new()?;
/// let form = FormValues { band_names: "Opeth".into(), ..FormValues::default() };
/// let payload = build_payload(&form, false);
/// let request = build_request("https://fn.example.com/", &payload, None, false)?;
///
/// let response = client.invoke(&request).await?;
/// println!("{} {}", response.status, response.to_pretty_json());
/// ```
#[derive(Clone)]
pub struct SetlistClient {
    http: Client,
}

impl SetlistClient {
    pub fn new() -> Result<Self> {
        let http = Client::builder()
            .user_agent(format!("gigset/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self { http })
    }

    /// Use an already configured reqwest client.
    pub fn with_http(http: Client) -> Self {
        Self { http }
    }
}

fn validate_url(url: &str) -> Result<()> {
    if url.is_empty() {
        return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ClientError::InvalidUrl(
            "URL must start with http:// or https://".into(),
        ));
    }
    url::Url::parse(url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
    Ok(())
}

#[async_trait]
impl Invoke for SetlistClient {
    async fn invoke(&self, request: &PreparedRequest) -> Result<ResponseEnvelope> {
        validate_url(&request.url)?;

        debug!(url = %request.url, mode = ?request.mode, "Invoking playlist function");

        let mut builder = self.http.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .body(request.body.clone())
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ClientError::Unreachable(e.to_string())
                } else {
                    ClientError::Request(e)
                }
            })?;

        let status = response.status();
        let text = response.text().await?;
        let envelope = ResponseEnvelope::from_text(status.as_u16(), &text);

        info!(
            status = status.as_u16(),
            bytes = text.len(),
            "Playlist function responded"
        );

        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_validation() {
        assert!(validate_url("https://example.com").is_ok());
        assert!(validate_url("http://127.0.0.1:8787/2015-03-31/functions/function/invocations").is_ok());

        assert!(validate_url("").is_err());
        assert!(validate_url("not-a-url").is_err());
        assert!(validate_url("ftp://example.com").is_err());
    }
}
