// JSON request helper.
//
// One call, one transport round trip. The body (if any) goes out as JSON
// with a default `Content-Type: application/json`, the response is always
// decoded as JSON first, and only then is the status checked. There is no
// retry, no timeout and no cancellation. Callers own escalation.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::transport::{ReqwestTransport, Transport, TransportRequest};

/// Per-request options. `method` defaults to GET.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Option<Method>,
    /// Caller headers. These win over the injected content type; names
    /// compare case-insensitively and later duplicates replace earlier ones.
    pub headers: Vec<(String, String)>,
    /// JSON body. When present the content type header is injected.
    pub body: Option<Value>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Why a request did not produce a value.
#[derive(Debug, Error)]
pub enum RequestError {
    /// A response arrived but its status was outside 2xx. Displays as the
    /// status text; the decoded body is kept for callers that want it.
    #[error("{status_text}")]
    Status {
        status: StatusCode,
        status_text: String,
        body: Value,
    },

    /// Anything below the HTTP layer: building the request, the network,
    /// or decoding the response body.
    #[error("{message}")]
    Transport { message: String },
}

impl RequestError {
    fn transport(message: impl Into<String>) -> Self {
        RequestError::Transport {
            message: message.into(),
        }
    }

    /// The response status, when one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RequestError::Status { status, .. } => Some(*status),
            RequestError::Transport { .. } => None,
        }
    }
}

/// JSON request helper over an injected transport.
#[derive(Clone)]
pub struct JsonClient {
    transport: Arc<dyn Transport>,
}

impl JsonClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Client over a fresh `ReqwestTransport`.
    pub fn with_reqwest(user_agent: &str) -> anyhow::Result<Self> {
        Ok(Self::new(Arc::new(ReqwestTransport::new(user_agent)?)))
    }

    /// Send one request and decode the JSON response into `T`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<T, RequestError> {
        let request = build_request(url, options)?;

        debug!(
            method = %request.method,
            url = url,
            has_body = request.body.is_some(),
            "JSON request"
        );

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| RequestError::transport(format!("{e:#}")))?;

        // Decode before looking at the status: an error status with a
        // non-JSON body surfaces as a decode failure.
        let data: Value = serde_json::from_slice(&response.body)
            .map_err(|e| RequestError::transport(e.to_string()))?;

        debug!(status = response.status.as_u16(), url = url, "JSON response");

        if !response.status.is_success() {
            return Err(RequestError::Status {
                status: response.status,
                status_text: response.status_text().to_string(),
                body: data,
            });
        }

        serde_json::from_value(data).map_err(|e| RequestError::transport(e.to_string()))
    }
}

/// Assemble method, headers and serialized body.
fn build_request(url: &str, options: RequestOptions) -> Result<TransportRequest, RequestError> {
    let RequestOptions {
        method,
        headers: caller_headers,
        body,
    } = options;

    let mut headers = HeaderMap::new();
    let body = match body {
        Some(value) => {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            let serialized = serde_json::to_string(&value)
                .map_err(|e| RequestError::transport(e.to_string()))?;
            Some(serialized)
        }
        None => None,
    };

    for (name, value) in &caller_headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| RequestError::transport(format!("Invalid header name {name:?}: {e}")))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| RequestError::transport(format!("Invalid value for header {name}: {e}")))?;
        headers.insert(header_name, header_value);
    }

    Ok(TransportRequest {
        method: method.unwrap_or(Method::GET),
        url: url.to_string(),
        headers,
        body,
    })
}
