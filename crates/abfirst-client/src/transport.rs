//! HTTP transport for the assignment service.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::{debug, error};

use abfirst_config::ConfigError;

use crate::error::FetchError;

/// JSON over HTTP with bearer authentication.
///
/// `extra_headers` are merged over the transport's base headers, replacing
/// any header of the same name.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, extra_headers: &HeaderMap) -> Result<Value, FetchError>;

    async fn post(&self, url: &str, body: &Value, extra_headers: &HeaderMap) -> Result<Value, FetchError>;
}

/// [`Transport`] backed by reqwest.
pub struct HttpTransport {
    client: reqwest::Client,
    base_headers: HeaderMap,
}

impl HttpTransport {
    pub fn new(api_token: &str) -> Result<Self, ConfigError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_token)).map_err(|e| {
            ConfigError::InvalidValue {
                field: "ab_tests.api_token".to_string(),
                message: e.to_string(),
            }
        })?;
        auth.set_sensitive(true);

        let mut base_headers = HeaderMap::new();
        base_headers.insert(AUTHORIZATION, auth);
        base_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(Self {
            client: reqwest::Client::new(),
            base_headers,
        })
    }

    fn headers(&self, extra_headers: &HeaderMap) -> HeaderMap {
        let mut headers = self.base_headers.clone();
        headers.extend(extra_headers.clone());
        headers
    }

    async fn send(&self, url: &str, request: reqwest::RequestBuilder) -> Result<Value, FetchError> {
        let response = request.send().await.map_err(|e| {
            error!(url, error = %e, "Request to assignment service failed");
            FetchError::Network {
                url: url.to_string(),
                message: e.to_string(),
            }
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| FetchError::Network {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        debug!(url, status, "Assignment service responded");
        parse_body(url, status, body)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, extra_headers: &HeaderMap) -> Result<Value, FetchError> {
        let request = self.client.get(url).headers(self.headers(extra_headers));
        self.send(url, request).await
    }

    async fn post(&self, url: &str, body: &Value, extra_headers: &HeaderMap) -> Result<Value, FetchError> {
        let request = self
            .client
            .post(url)
            .headers(self.headers(extra_headers))
            .body(body.to_string());
        self.send(url, request).await
    }
}

/// Turn a raw response into JSON. An empty body reads as `{}`.
pub(crate) fn parse_body(url: &str, status: u16, body: String) -> Result<Value, FetchError> {
    if !(200..300).contains(&status) {
        error!(url, status, body = %body, "Assignment service returned an error status");
        return Err(FetchError::Http {
            url: url.to_string(),
            status,
            body,
        });
    }

    if body.is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }

    serde_json::from_str(&body).map_err(|e| {
        error!(url, status, body = %body, "Could not parse assignment service response");
        FetchError::InvalidJson {
            url: url.to_string(),
            status,
            message: e.to_string(),
            body,
        }
    })
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
