//! Response value object.
//!
//! # Responsibilities
//! - Hold status, headers and body while the chain runs
//! - Emit itself to an [`Output`] in status, headers, body order
//! - Convert into an axum response for the tower adapter

use std::io;

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};

use crate::http::output::Output;

/// The response built by a handler chain. Starts as `200 OK`, empty.
#[derive(Debug, Clone, Default)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(status: StatusCode) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    /// A `text/plain` response.
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        let mut res = Self::with_status(status);
        res.set_text(body);
        res
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn insert_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        self.body = body.into();
    }

    /// Set a UTF-8 body and its content type.
    pub fn set_text(&mut self, body: impl Into<String>) {
        self.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        self.body = Bytes::from(body.into());
    }

    /// Hand the response to the output boundary.
    pub fn emit<O: Output + ?Sized>(&self, out: &mut O) -> io::Result<()> {
        out.status(self.status)?;
        for (name, value) in &self.headers {
            out.header(name, value)?;
        }
        out.body(&self.body)
    }

    pub fn into_http(self) -> axum::response::Response {
        let mut res = axum::response::Response::new(Body::from(self.body));
        *res.status_mut() = self.status;
        *res.headers_mut() = self.headers;
        res
    }
}
