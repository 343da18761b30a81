//! Error types shared across the crate.
//!
//! Registration errors surface at configuration time; dispatch errors surface
//! from [`Dispatcher::start`](crate::dispatch::Dispatcher::start) and may be
//! recovered by the dispatcher's error callback.

use thiserror::Error;

pub use tower::BoxError;

/// Failure while building a router.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("unknown HTTP method `{0}`")]
    UnknownMethod(String),

    #[error("invalid path pattern `{0}`")]
    InvalidPath(String),

    #[error("no handlers supplied for {method} {path}")]
    NoHandlers { method: String, path: String },

    #[error("an error handler is already registered")]
    DuplicateErrorHandler,
}

/// Failure during one dispatch cycle.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("route not found: {method} {path}")]
    RouteNotFound { method: String, path: String },

    /// Raised by a handler; carried unchanged.
    #[error("handler failed: {0}")]
    Handler(#[source] BoxError),

    #[error("error handler returned no response, cannot cast to Response")]
    ErrorCallbackContract {
        #[source]
        source: Box<DispatchError>,
    },

    #[error("failed to write response: {0}")]
    Output(#[from] std::io::Error),
}

impl DispatchError {
    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::RouteNotFound { .. } => "route_not_found",
            DispatchError::Handler(_) => "handler",
            DispatchError::ErrorCallbackContract { .. } => "error_callback_contract",
            DispatchError::Output(_) => "output",
        }
    }
}
