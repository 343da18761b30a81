//! Handler trait and closure adapters.

use std::fmt;
use std::sync::Arc;

use crate::chain::Next;
use crate::error::BoxError;
use crate::http::{Request, Response};

/// What a handler hands back. An error aborts the chain; the response keeps
/// whatever was written to it before the failure.
pub type HandlerResult = Result<(), BoxError>;

/// One step of a handler chain.
///
/// A handler mutates the shared response in place (or replaces it outright)
/// and then either calls `next.run(req, res)` to pass control on, returns
/// `Ok(())` without calling it to end the chain, or returns an error.
pub trait Handler: Send + Sync {
    fn call(&self, req: &mut Request, res: &mut Response, next: Next<'_>) -> HandlerResult;

    /// Label used in route listings and logs.
    fn name(&self) -> &str {
        ANONYMOUS
    }
}

/// Label of handlers registered without one.
pub const ANONYMOUS: &str = "<fn>";

/// Handlers are shared between the route table and every in-flight chain.
pub type SharedHandler = Arc<dyn Handler>;

/// A closure registered as a handler.
pub struct HandlerFn<F> {
    name: String,
    f: F,
}

impl<F> Handler for HandlerFn<F>
where
    F: Fn(&mut Request, &mut Response, Next<'_>) -> HandlerResult + Send + Sync,
{
    fn call(&self, req: &mut Request, res: &mut Response, next: Next<'_>) -> HandlerResult {
        (self.f)(req, res, next)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<F> fmt::Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerFn").field("name", &self.name).finish()
    }
}

/// Wrap a closure as an anonymous handler.
pub fn handler_fn<F>(f: F) -> SharedHandler
where
    F: Fn(&mut Request, &mut Response, Next<'_>) -> HandlerResult + Send + Sync + 'static,
{
    named(ANONYMOUS, f)
}

/// Wrap a closure as a handler with a label.
pub fn named<F>(name: impl Into<String>, f: F) -> SharedHandler
where
    F: Fn(&mut Request, &mut Response, Next<'_>) -> HandlerResult + Send + Sync + 'static,
{
    Arc::new(HandlerFn {
        name: name.into(),
        f,
    })
}
