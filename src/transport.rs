use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use std::time::Instant;
use url::Url;

use crate::error::{ClientError, ClientResult};
use crate::utils::sanitize::sanitize_json;

const JSON_MIME: &str = "application/json";

/// Methods the gateway accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
}

impl HttpMethod {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
        }
    }

    /// Whether a JSON body is sent with this method.
    pub fn carries_body(self) -> bool {
        !matches!(self, HttpMethod::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_reqwest().as_str())
    }
}

/// Decoded response body. Which variant arrives depends on the declared
/// content type, so callers match on it instead of assuming a shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    pub fn is_empty(&self) -> bool {
        match self {
            Payload::Json(Value::Null) => true,
            Payload::Json(_) => false,
            Payload::Text(text) => text.trim().is_empty(),
        }
    }
}

/// HTTP transport bound to the gateway's fixed base URL
#[derive(Clone)]
pub struct ApiTransport {
    client: Client,
    base_url: Url,
    log_request_body: bool,
}

impl ApiTransport {
    /// Creates a transport for the given base URL, e.g. `http://localhost:9000/api`.
    ///
    /// No timeout is configured; requests wait as long as the underlying
    /// connection allows.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(format!(
                "{base_url}: cannot be used as a base"
            )));
        }

        Ok(ApiTransport {
            client: Client::new(),
            base_url,
            log_request_body: false,
        })
    }

    /// Logs sanitized JSON request bodies at debug level when enabled.
    pub fn with_body_logging(mut self, enabled: bool) -> Self {
        self.log_request_body = enabled;
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Appends `segments` to the base path. Each segment is percent-encoded on
    /// its own, so identifiers containing `/`, `?` or spaces round-trip intact.
    pub fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issues one request. Non-2xx answers become [`ClientError::Http`] with
    /// the raw body text. No retries are attempted.
    pub async fn request(
        &self,
        method: HttpMethod,
        segments: &[&str],
        body: Option<&Value>,
    ) -> ClientResult<Payload> {
        let url = self.endpoint(segments)?;
        let start = Instant::now();

        let mut builder = self
            .client
            .request(method.as_reqwest(), url.clone())
            .header(ACCEPT, JSON_MIME);

        if let Some(body) = body.filter(|_| method.carries_body()) {
            if self.log_request_body {
                tracing::debug!(
                    method = %method,
                    url = %url,
                    body = %sanitize_json(body),
                    "Outgoing request body"
                );
            }
            builder = builder.header(CONTENT_TYPE, JSON_MIME).json(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(method = %method, url = %url, error = %e, "Request failed");
            ClientError::Request(e)
        })?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.contains(JSON_MIME))
            .unwrap_or(false);

        tracing::info!(
            method = %method,
            url = %url,
            status = status.as_u16(),
            latency_ms = start.elapsed().as_millis() as u64,
            "API call completed"
        );

        let text = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        decode_body(is_json, text)
    }
}

fn decode_body(is_json: bool, text: String) -> ClientResult<Payload> {
    if is_json && !text.trim().is_empty() {
        Ok(Payload::Json(serde_json::from_str(&text)?))
    } else {
        Ok(Payload::Text(text))
    }
}
