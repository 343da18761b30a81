//! Handler chain execution.
//!
//! # Data Flow
//! ```text
//! Router::resolve → Vec<Resolved>
//!     → Chain::run(req, &mut res)
//!     → Next::run → handler[0](req, res, next)
//!                       → next.run → handler[1](req, res, next)
//!                                        → ...
//!     ← Ok(()) or the first error raised; `res` holds every write so far
//! ```
//!
//! # Design Decisions
//! - Continuations are plain nested calls: stack depth equals chain length
//! - `Next` is consumed when run, so a handler can continue at most once
//! - Errors are never caught here; they propagate unchanged to the caller
//! - The response is borrowed, not moved, so it survives a failing handler
//! - A `Chain` is consumed by `run` and cannot be reused

pub mod handler;

pub use handler::{handler_fn, named, Handler, HandlerFn, HandlerResult, SharedHandler};

use std::fmt;

use crate::http::{Request, Response};
use crate::routing::Params;

/// A handler selected by resolve, with the params its route captured.
#[derive(Clone)]
pub struct Resolved {
    pub handler: SharedHandler,
    pub params: Params,
}

impl Resolved {
    pub fn name(&self) -> &str {
        self.handler.name()
    }
}

impl fmt::Debug for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolved")
            .field("handler", &self.handler.name())
            .field("params", &self.params)
            .finish()
    }
}

/// The ordered handlers for one request.
#[derive(Debug)]
pub struct Chain {
    handlers: Vec<Resolved>,
}

impl Chain {
    pub fn new(handlers: Vec<Resolved>) -> Self {
        Self { handlers }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run the chain from its first handler against `res`.
    pub fn run(self, req: &mut Request, res: &mut Response) -> HandlerResult {
        Next {
            rest: &self.handlers,
        }
        .run(req, res)
    }
}

/// Continuation bound to the handlers after the current one.
pub struct Next<'a> {
    rest: &'a [Resolved],
}

impl<'a> Next<'a> {
    /// Invoke the next handler. Past the end of the chain this is a no-op.
    pub fn run(self, req: &mut Request, res: &mut Response) -> HandlerResult {
        let Some((current, rest)) = self.rest.split_first() else {
            return Ok(());
        };

        tracing::trace!(
            request_id = %req.id(),
            handler = current.name(),
            remaining = rest.len(),
            "Invoking handler"
        );

        let outer = req.replace_params(current.params.clone());
        let result = current.handler.call(req, res, Next { rest });
        req.replace_params(outer);
        result
    }

    /// Number of handlers still ahead.
    pub fn remaining(&self) -> usize {
        self.rest.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use std::sync::{Arc, Mutex};

    fn resolved(handler: SharedHandler) -> Resolved {
        Resolved {
            handler,
            params: Params::default(),
        }
    }

    fn recording(log: &Arc<Mutex<Vec<&'static str>>>, label: &'static str) -> SharedHandler {
        let log = log.clone();
        handler_fn(move |req, res, next| {
            log.lock().unwrap().push(label);
            next.run(req, res)
        })
    }

    #[test]
    fn test_empty_chain_returns_response_unchanged() {
        let mut req = Request::new("GET", "/");
        let mut res = Response::with_status(StatusCode::ACCEPTED);
        Chain::new(Vec::new()).run(&mut req, &mut res).unwrap();
        assert_eq!(res.status(), StatusCode::ACCEPTED);
    }

    #[test]
    fn test_handlers_run_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = Chain::new(vec![
            resolved(recording(&log, "a")),
            resolved(recording(&log, "b")),
            resolved(recording(&log, "c")),
        ]);

        let mut req = Request::new("GET", "/");
        chain.run(&mut req, &mut Response::new()).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_short_circuit_skips_rest() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let stop = handler_fn(|_req, res, _next| {
            res.set_status(StatusCode::FORBIDDEN);
            Ok(())
        });
        let chain = Chain::new(vec![
            resolved(recording(&log, "first")),
            resolved(stop),
            resolved(recording(&log, "third")),
        ]);

        let mut req = Request::new("GET", "/");
        let mut res = Response::new();
        chain.run(&mut req, &mut res).unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert_eq!(*log.lock().unwrap(), vec!["first"]);
    }

    #[test]
    fn test_error_propagates_unchanged() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let fail = handler_fn(|_req, _res, _next| Err("boom".into()));
        let chain = Chain::new(vec![resolved(fail), resolved(recording(&log, "after"))]);

        let mut req = Request::new("GET", "/");
        let err = chain.run(&mut req, &mut Response::new()).unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_writes_before_error_are_kept() {
        let cors = handler_fn(|req, res, next| {
            res.insert_header(
                HeaderName::from_static("x-cors"),
                HeaderValue::from_static("*"),
            );
            res.set_status(StatusCode::ACCEPTED);
            next.run(req, res)
        });
        let fail = handler_fn(|_req, _res, _next| Err("boom".into()));

        let mut req = Request::new("GET", "/");
        let mut res = Response::new();
        Chain::new(vec![resolved(cors), resolved(fail)])
            .run(&mut req, &mut res)
            .unwrap_err();

        assert_eq!(res.status(), StatusCode::ACCEPTED);
        assert_eq!(res.headers()["x-cors"], "*");
    }

    #[test]
    fn test_handler_can_post_process() {
        let wrap = handler_fn(|req, res, next| {
            next.run(req, res)?;
            res.set_status(StatusCode::CREATED);
            Ok(())
        });
        let inner = handler_fn(|_req, res, _next| {
            res.set_text("inner");
            Ok(())
        });

        let mut req = Request::new("GET", "/");
        let mut res = Response::new();
        Chain::new(vec![resolved(wrap), resolved(inner)])
            .run(&mut req, &mut res)
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(res.body().as_ref(), b"inner");
    }

    #[test]
    fn test_params_scoped_to_each_handler() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let outer_seen = seen.clone();
        let outer = handler_fn(move |req, res, next| {
            next.run(req, res)?;
            outer_seen
                .lock()
                .unwrap()
                .push(req.param("id").map(str::to_string));
            Ok(())
        });
        let inner_seen = seen.clone();
        let inner = handler_fn(move |req, _res, _next| {
            inner_seen
                .lock()
                .unwrap()
                .push(req.param("id").map(str::to_string));
            Ok(())
        });

        let params = crate::routing::match_path("/users/:id", "/users/7").params;
        let chain = Chain::new(vec![
            resolved(outer),
            Resolved {
                handler: inner,
                params,
            },
        ]);

        let mut req = Request::new("GET", "/users/7");
        chain.run(&mut req, &mut Response::new()).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![Some("7".to_string()), None]);
    }
}
