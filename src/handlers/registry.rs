//! Handler specs → handlers.
//!
//! A spec is `name` or `name:argument`. The registry maps each name to a
//! factory that receives the argument and builds the handler once, at
//! configuration time. Built handlers are labelled with their full spec.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::chain::{Handler, HandlerResult, Next, SharedHandler};
use crate::http::{Request, Response};

/// Failure to turn a spec into a handler.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HandlerSpecError {
    #[error("unknown handler `{0}`")]
    Unknown(String),

    #[error("invalid argument for handler `{spec}`: {reason}")]
    InvalidArgument { spec: String, reason: String },
}

/// Builds a handler from the spec argument (the part after `:`).
pub type HandlerFactory =
    Arc<dyn Fn(Option<&str>) -> Result<SharedHandler, String> + Send + Sync>;

/// Named handler factories.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    factories: HashMap<String, HandlerFactory>,
}

impl HandlerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in handlers.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::handlers::builtin::register_all(&mut registry);
        registry
    }

    /// Register (or replace) a factory.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(Option<&str>) -> Result<SharedHandler, String> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build the handler described by `spec`.
    pub fn build(&self, spec: &str) -> Result<SharedHandler, HandlerSpecError> {
        let spec = spec.trim();
        let (name, arg) = match spec.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (spec, None),
        };

        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| HandlerSpecError::Unknown(name.to_string()))?;

        let inner = factory(arg).map_err(|reason| HandlerSpecError::InvalidArgument {
            spec: spec.to_string(),
            reason,
        })?;

        Ok(Arc::new(Labeled {
            label: spec.to_string(),
            inner,
        }))
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("names", &self.names())
            .finish()
    }
}

struct Labeled {
    label: String,
    inner: SharedHandler,
}

impl Handler for Labeled {
    fn call(&self, req: &mut Request, res: &mut Response, next: Next<'_>) -> HandlerResult {
        self.inner.call(req, res, next)
    }

    fn name(&self) -> &str {
        &self.label
    }
}
