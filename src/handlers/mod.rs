//! Named handlers for config-driven route tables.

pub mod builtin;
pub mod registry;

pub use registry::{HandlerFactory, HandlerRegistry, HandlerSpecError};
