//! Outgoing REST response handed back to the dispatch framework.

use http::{HeaderMap, StatusCode};
use serde_json::Value;

/// A serialized response on its way back to the client.
///
/// # Examples
///
/// ```
/// use content_exposure::web::RestResponse;
/// use http::{HeaderMap, HeaderValue, StatusCode};
///
/// let mut response = RestResponse::ok(serde_json::json!({"id": 1}));
/// response.headers.insert("x-total", HeaderValue::from_static("1"));
///
/// let mut extra = HeaderMap::new();
/// extra.insert("x-total", HeaderValue::from_static("99"));
/// extra.insert("x-page", HeaderValue::from_static("2"));
/// response.merge_headers(extra);
///
/// assert_eq!(response.status, StatusCode::OK);
/// assert_eq!(response.headers["x-total"], "1");
/// assert_eq!(response.headers["x-page"], "2");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RestResponse {
    /// HTTP status
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// JSON body
    pub body: Value,
}

impl RestResponse {
    /// Creates a response with the given status and no headers.
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body,
        }
    }

    /// A `200 OK` response.
    pub fn ok(body: Value) -> Self {
        Self::new(StatusCode::OK, body)
    }

    /// Adds `extra` headers whose names are not present yet.
    ///
    /// Headers already on the response always win.
    pub fn merge_headers(&mut self, extra: HeaderMap) {
        for (name, value) in extra.iter() {
            if !self.headers.contains_key(name) {
                self.headers.insert(name.clone(), value.clone());
            }
        }
    }
}
