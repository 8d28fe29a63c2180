//! Transport errors.

use serde_json::{Value, json};
use thiserror::Error;

/// A failed call to the assignment service.
///
/// Callers decide whether to fail the page render or fall back to
/// unfiltered content; nothing is retried here.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed with status {status}")]
    Http { url: String, status: u16, body: String },

    #[error("Invalid JSON from {url} (status {status}): {message}")]
    InvalidJson {
        url: String,
        status: u16,
        body: String,
        message: String,
    },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },
}

impl FetchError {
    /// Stable tag for every transport error.
    pub const KIND: &'static str = "fetch-error";

    pub fn kind(&self) -> &'static str {
        Self::KIND
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Http { url, .. } | Self::InvalidJson { url, .. } | Self::Network { url, .. } => url,
        }
    }

    /// HTTP status, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } | Self::InvalidJson { status, .. } => Some(*status),
            Self::Network { .. } => None,
        }
    }

    /// Raw response body, when a response was received.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Http { body, .. } | Self::InvalidJson { body, .. } => Some(body),
            Self::Network { .. } => None,
        }
    }

    /// `{type, url, status, body}` for handing to a host pipeline.
    pub fn to_json(&self) -> Value {
        json!({
            "type": self.kind(),
            "url": self.url(),
            "status": self.status(),
            "body": self.body(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_accessors() {
        let err = FetchError::Http {
            url: "https://ab.example.com/api/assignments".to_string(),
            status: 502,
            body: "Bad Gateway".to_string(),
        };
        assert_eq!(err.kind(), "fetch-error");
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.body(), Some("Bad Gateway"));
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_network_error_has_no_status() {
        let err = FetchError::Network {
            url: "https://ab.example.com".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(err.status(), None);
        assert_eq!(err.body(), None);
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_to_json() {
        let err = FetchError::InvalidJson {
            url: "https://ab.example.com/x".to_string(),
            status: 200,
            body: "<html>".to_string(),
            message: "expected value".to_string(),
        };
        assert_eq!(
            err.to_json(),
            json!({
                "type": "fetch-error",
                "url": "https://ab.example.com/x",
                "status": 200,
                "body": "<html>"
            })
        );
    }
}
