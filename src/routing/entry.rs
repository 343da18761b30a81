//! Route entries.

use std::fmt;
use std::sync::Arc;

use crate::chain::SharedHandler;
use crate::error::RegistrationError;
use crate::routing::matcher::{segments, PARAM_PREFIX, WILDCARD};
use crate::routing::method::MethodPattern;
use crate::routing::router::Router;

/// What a matching entry contributes.
#[derive(Clone)]
pub enum Target {
    Handler(SharedHandler),
    /// A mounted router, resolved against the remainder of the path.
    Router(Arc<Router>),
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Handler(h) => f.debug_tuple("Handler").field(&h.name()).finish(),
            Target::Router(r) => f.debug_tuple("Router").field(&r.len()).finish(),
        }
    }
}

/// One registered `(method, path, target)` triple. Immutable once built.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    method: MethodPattern,
    path: String,
    target: Target,
}

impl RouteEntry {
    pub fn new(
        method: MethodPattern,
        path: impl Into<String>,
        target: Target,
    ) -> Result<Self, RegistrationError> {
        let path = path.into();
        validate_pattern(&path)?;
        Ok(Self {
            method,
            path,
            target,
        })
    }

    /// A `*`/`*` entry.
    pub fn catch_all(target: Target) -> Self {
        Self {
            method: MethodPattern::Any,
            path: WILDCARD.to_string(),
            target,
        }
    }

    pub fn method(&self) -> MethodPattern {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// `*` entries match every path regardless of the mount prefix.
    pub fn is_catch_all(&self) -> bool {
        self.path.trim() == WILDCARD
    }
}

/// A pattern is `*` or an absolute `/`-delimited path with named segments
/// that actually carry a name.
pub fn validate_pattern(path: &str) -> Result<(), RegistrationError> {
    let trimmed = path.trim();
    if trimmed == WILDCARD {
        return Ok(());
    }
    if !trimmed.starts_with('/') {
        return Err(RegistrationError::InvalidPath(path.to_string()));
    }
    if segments(trimmed).any(|s| s.strip_prefix(PARAM_PREFIX) == Some("")) {
        return Err(RegistrationError::InvalidPath(path.to_string()));
    }
    Ok(())
}
