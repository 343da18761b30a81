//! The dispatch entry point.
//!
//! # Responsibilities
//! - Resolve the request against the root router
//! - Run the resolved chain against a fresh response
//! - Recover failures through the single optional error callback
//! - Emit the final response to the output boundary
//!
//! # Design Decisions
//! - Route-not-found goes through the error callback like handler errors
//! - On a handler error the callback sees the response as the chain left it,
//!   so headers and status set by earlier middleware survive the failure;
//!   on route-not-found it sees a fresh one
//! - A callback that declines to produce a response is itself an error

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use axum::http::StatusCode;

use crate::chain::{Chain, Resolved};
use crate::config::{validate_config, ConfigError, DispatchConfig, ErrorResponseConfig, MountConfig, RouteConfig};
use crate::error::{DispatchError, RegistrationError};
use crate::handlers::HandlerRegistry;
use crate::http::{Output, Request, Response};
use crate::observability::metrics;
use crate::routing::{ResolveOrder, Router};

/// Recovers a failed dispatch. `None` means "no response", which is fatal.
pub type ErrorHandler =
    Box<dyn Fn(&DispatchError, &Request, &Response) -> Option<Response> + Send + Sync>;

/// Runs full request/response cycles against a root router.
pub struct Dispatcher {
    root: Arc<Router>,
    order: ResolveOrder,
    on_error: Option<ErrorHandler>,
}

impl Dispatcher {
    pub fn new(root: Router) -> Self {
        Self {
            root: Arc::new(root),
            order: ResolveOrder::default(),
            on_error: None,
        }
    }

    pub fn with_order(mut self, order: ResolveOrder) -> Self {
        self.order = order;
        self
    }

    /// Register the error callback. Only one is allowed.
    pub fn on_error<F>(&mut self, callback: F) -> Result<&mut Self, RegistrationError>
    where
        F: Fn(&DispatchError, &Request, &Response) -> Option<Response> + Send + Sync + 'static,
    {
        if self.on_error.is_some() {
            return Err(RegistrationError::DuplicateErrorHandler);
        }
        self.on_error = Some(Box::new(callback));
        Ok(self)
    }

    /// Build a dispatcher from a config, resolving handler specs in `registry`.
    pub fn from_config(
        config: &DispatchConfig,
        registry: &HandlerRegistry,
    ) -> Result<Self, ConfigError> {
        validate_config(config).map_err(ConfigError::Validation)?;

        let root = build_router(&config.routes, &config.mounts, registry)?;
        let mut dispatcher = Dispatcher::new(root).with_order(config.resolve_order);
        if let Some(on_error) = &config.on_error {
            dispatcher.on_error(error_responder(on_error.clone()))?;
        }
        Ok(dispatcher)
    }

    pub fn router(&self) -> &Router {
        &self.root
    }

    pub fn order(&self) -> ResolveOrder {
        self.order
    }

    pub fn has_error_handler(&self) -> bool {
        self.on_error.is_some()
    }

    pub fn resolve(&self, req: &Request) -> Vec<Resolved> {
        self.root.resolve_with(req, self.order)
    }

    /// Run one full cycle and write the final response to `out`.
    pub fn start<O: Output + ?Sized>(&self, mut req: Request, out: &mut O) -> Result<(), DispatchError> {
        let res = self.handle(&mut req)?;
        res.emit(out)?;
        Ok(())
    }

    /// Run one full cycle and return the final response.
    pub fn handle(&self, req: &mut Request) -> Result<Response, DispatchError> {
        let start = Instant::now();
        let span = tracing::debug_span!(
            "dispatch",
            request_id = %req.id(),
            method = %req.method(),
            path = %req.path()
        );
        let _enter = span.enter();

        let resolved = self.resolve(req);
        let chain_len = resolved.len();

        let mut res = Response::new();
        let outcome = if resolved.is_empty() {
            Err(DispatchError::RouteNotFound {
                method: req.method().to_string(),
                path: req.path().to_string(),
            })
        } else {
            Chain::new(resolved)
                .run(req, &mut res)
                .map_err(DispatchError::Handler)
        };

        let result = match outcome {
            Ok(()) => Ok(res),
            Err(err) => self.recover(err, req, &res),
        };

        let status = match &result {
            Ok(res) => res.status(),
            Err(DispatchError::RouteNotFound { .. }) => StatusCode::NOT_FOUND,
            Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        metrics::record_dispatch(req.method(), status.as_u16(), chain_len, start);

        result
    }

    fn recover(
        &self,
        err: DispatchError,
        req: &Request,
        res: &Response,
    ) -> Result<Response, DispatchError> {
        metrics::record_error(err.kind());

        let Some(callback) = &self.on_error else {
            tracing::warn!(error = %err, "Dispatch failed, no error handler registered");
            return Err(err);
        };

        tracing::debug!(error = %err, "Dispatch failed, invoking error handler");
        match callback(&err, req, res) {
            Some(res) => Ok(res),
            None => {
                tracing::error!(error = %err, "Error handler returned no response");
                Err(DispatchError::ErrorCallbackContract {
                    source: Box::new(err),
                })
            }
        }
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("routes", &self.root.len())
            .field("order", &self.order)
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

fn build_router(
    routes: &[RouteConfig],
    mounts: &[MountConfig],
    registry: &HandlerRegistry,
) -> Result<Router, ConfigError> {
    let mut router = Router::new();

    for route in routes {
        let handlers = route
            .handlers
            .iter()
            .map(|spec| registry.build(spec))
            .collect::<Result<Vec<_>, _>>()?;
        router.route(&route.method, &route.path, handlers)?;
    }

    for mount in mounts {
        let child = build_router(&mount.routes, &mount.mounts, registry)?;
        router.mount(&mount.prefix, child)?;
    }

    Ok(router)
}

fn error_responder(
    config: ErrorResponseConfig,
) -> impl Fn(&DispatchError, &Request, &Response) -> Option<Response> + Send + Sync + 'static {
    move |err, _req, res| {
        let code = match err {
            DispatchError::RouteNotFound { .. } => config.not_found_status,
            _ => config.status,
        };
        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = config.body.clone().unwrap_or_else(|| err.to_string());

        let mut recovered = res.clone();
        recovered.set_status(status);
        recovered.set_text(body);
        Some(recovered)
    }
}
