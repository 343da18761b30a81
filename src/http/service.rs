//! Tower service adapter.
//!
//! # Responsibilities
//! - Buffer the request body up to a limit
//! - Convert to `Request`, dispatch, convert the result back
//! - Map unrecovered dispatch errors to status codes
//!
//! # Design Decisions
//! - The dispatcher is loaded once per request (hot reload safe)
//! - Unrecovered `RouteNotFound` → 404, anything else → 500
//! - Error details are logged, never sent to the client

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::http::StatusCode;
use axum::response::IntoResponse;
use tower::Service;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::dispatch::SharedDispatcher;
use crate::error::DispatchError;
use crate::http::Request;

/// Default cap on buffered request bodies.
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Serves requests through a [`SharedDispatcher`].
#[derive(Clone, Debug)]
pub struct DispatchService {
    dispatcher: SharedDispatcher,
    body_limit: usize,
}

impl DispatchService {
    pub fn new(dispatcher: SharedDispatcher) -> Self {
        Self {
            dispatcher,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }
}

impl Service<axum::extract::Request> for DispatchService {
    type Response = axum::response::Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: axum::extract::Request) -> Self::Future {
        let dispatcher = self.dispatcher.load();
        let limit = self.body_limit;

        Box::pin(async move {
            let (parts, body) = req.into_parts();
            let bytes = match axum::body::to_bytes(body, limit).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(error = %e, limit, "Failed to buffer request body");
                    return Ok((StatusCode::BAD_REQUEST, "Failed to read request body").into_response());
                }
            };

            let mut request = Request::from_http(axum::http::Request::from_parts(parts, bytes));
            let response = match dispatcher.handle(&mut request) {
                Ok(res) => res.into_http(),
                Err(err) => error_response(&err, &request),
            };
            Ok(response)
        })
    }
}

fn error_response(err: &DispatchError, req: &Request) -> axum::response::Response {
    match err {
        DispatchError::RouteNotFound { .. } => {
            tracing::warn!(request_id = %req.id(), path = %req.path(), "No route matched");
            (StatusCode::NOT_FOUND, "No matching route found").into_response()
        }
        _ => {
            tracing::error!(request_id = %req.id(), error = %err, "Dispatch failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

/// An axum router sending every request to the dispatcher, with request ID
/// assignment and propagation and HTTP tracing.
///
/// `body_limit` is normally `DispatchConfig::http.body_limit_bytes`.
pub fn into_axum_router(dispatcher: SharedDispatcher, body_limit: usize) -> axum::Router {
    axum::Router::new()
        .fallback_service(DispatchService::new(dispatcher).with_body_limit(body_limit))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
