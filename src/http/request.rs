//! Request value object.
//!
//! # Responsibilities
//! - Carry method, path, headers and body through one dispatch cycle
//! - Carry the params captured for the handler currently running
//! - Assign a request ID (from `x-request-id` or a fresh UUID)
//!
//! # Design Decisions
//! - Method stored uppercase as received; unknown methods are allowed and
//!   simply match nothing but `*` entries
//! - Body fully buffered as `Bytes`

use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use uuid::Uuid;

use crate::routing::Params;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// An incoming request.
#[derive(Debug, Clone)]
pub struct Request {
    id: String,
    method: String,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    body: Bytes,
    params: Params,
}

impl Request {
    /// Create a request with no headers and an empty body.
    pub fn new(method: impl AsRef<str>, path: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            method: method.as_ref().trim().to_ascii_uppercase(),
            path: path.into(),
            query: None,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            params: Params::default(),
        }
    }

    /// Convert a buffered HTTP request.
    pub fn from_http(request: axum::http::Request<Bytes>) -> Self {
        let (parts, body) = request.into_parts();
        let id = parts
            .headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Self {
            id,
            method: parts.method.as_str().to_ascii_uppercase(),
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(str::to_string),
            headers: parts.headers,
            body,
            params: Params::default(),
        }
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value as a string, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Params captured by the route of the handler currently running.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Shorthand for `params().get(name)`. The value is percent-decoded;
    /// `path()` is not.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// Install `params`, returning the ones they replace.
    pub(crate) fn replace_params(&mut self, params: Params) -> Params {
        std::mem::replace(&mut self.params, params)
    }
}
