//! Request routing engine.
//!
//! Resolves a request (method + path) against a tree of routers into an
//! ordered handler chain, runs the chain, and hands the response to an
//! output boundary.

pub mod chain;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod http;
pub mod observability;
pub mod routing;

pub use chain::{handler_fn, named, Chain, Handler, HandlerResult, Next, SharedHandler};
pub use config::DispatchConfig;
pub use dispatch::{Dispatcher, SharedDispatcher};
pub use error::{BoxError, DispatchError, RegistrationError};
pub use handlers::HandlerRegistry;
pub use http::{Output, Request, Response, WriterOutput};
pub use routing::{Method, ResolveOrder, Router};
