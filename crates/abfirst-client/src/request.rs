//! Per-request visitor context.

use reqwest::header::HeaderMap;
use serde_json::Value;

/// Query parameter that switches assignment resolution to preview mode.
pub const PREVIEW_PARAM: &str = "abTestPreview";

/// What the assignment service needs to know about one page view.
#[derive(Debug, Clone, Default)]
pub struct VisitorRequest {
    /// Id of the page being rendered.
    pub page_id: String,
    /// Assignment cookie the visitor sent, if any.
    pub cookie_hash: Option<String>,
    /// Headers forwarded to the assignment service.
    pub security_headers: HeaderMap,
    /// Raw query string of the page request, without the leading `?`.
    pub raw_query: String,
    /// Forward the raw query to the service instead of resolving normally.
    pub preview: bool,
}

impl VisitorRequest {
    pub fn new(page_id: impl Into<String>) -> Self {
        Self {
            page_id: page_id.into(),
            ..Default::default()
        }
    }

    /// Build a request for a page document, reading the page id from `id`.
    pub fn for_page(page: &Value) -> Option<Self> {
        page_id_of(page).map(Self::new)
    }

    /// Set the visitor's cookie. An empty value counts as no cookie.
    pub fn with_cookie_hash(mut self, cookie_hash: impl Into<String>) -> Self {
        let cookie_hash = cookie_hash.into();
        self.cookie_hash = (!cookie_hash.is_empty()).then_some(cookie_hash);
        self
    }

    /// Set the raw query string; preview mode follows its `abTestPreview` parameter.
    pub fn with_query(mut self, raw_query: impl Into<String>) -> Self {
        let raw_query = raw_query.into();
        self.raw_query = raw_query.trim_start_matches('?').to_string();
        self.preview = is_preview_query(&self.raw_query);
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.security_headers = headers;
        self
    }

    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }
}

/// Page id from a page document's `id` field, string or number.
pub fn page_id_of(page: &Value) -> Option<String> {
    match page.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Whether the query carries a non-empty `abTestPreview` parameter.
///
/// Any non-empty value counts, including `0` and `false`.
pub fn is_preview_query(raw_query: &str) -> bool {
    url::form_urlencoded::parse(raw_query.as_bytes())
        .any(|(key, value)| key == PREVIEW_PARAM && !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_id_string_or_number() {
        assert_eq!(page_id_of(&json!({"id": 42})).as_deref(), Some("42"));
        assert_eq!(page_id_of(&json!({"id": "home"})).as_deref(), Some("home"));
        assert_eq!(page_id_of(&json!({"id": ""})), None);
        assert_eq!(page_id_of(&json!({"title": "x"})), None);
        assert_eq!(page_id_of(&json!({"id": [1]})), None);
    }

    #[test]
    fn test_for_page() {
        let request = VisitorRequest::for_page(&json!({"id": 7})).unwrap();
        assert_eq!(request.page_id, "7");
        assert!(!request.preview);
        assert!(request.cookie_hash.is_none());
    }

    #[test]
    fn test_with_cookie_hash() {
        let request = VisitorRequest::new("1").with_cookie_hash("abc");
        assert_eq!(request.cookie_hash.as_deref(), Some("abc"));

        let request = VisitorRequest::new("1").with_cookie_hash("");
        assert!(request.cookie_hash.is_none());
    }

    #[test]
    fn test_preview_query() {
        assert!(is_preview_query("abTestPreview=1&variant=B"));
        assert!(is_preview_query("foo=bar&abTestPreview=true"));
        assert!(is_preview_query("abTestPreview=0"));
        assert!(is_preview_query("abTestPreview=false"));
        assert!(!is_preview_query("abTestPreview"));
        assert!(!is_preview_query("abTestPreview="));
        assert!(!is_preview_query("preview=1"));
        assert!(!is_preview_query(""));
    }

    #[test]
    fn test_with_query_strips_question_mark() {
        let request = VisitorRequest::new("1").with_query("?abTestPreview=1&test=t1");
        assert_eq!(request.raw_query, "abTestPreview=1&test=t1");
        assert!(request.preview);
    }
}
