//! Route registration and recursive resolution.
//!
//! # Responsibilities
//! - Store route entries in registration order
//! - Resolve a request into the ordered handlers of every matching entry
//! - Recurse into mounted routers with the mount pattern as prefix
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - The mount prefix travels as a parameter, never as router state
//! - Every entry at a level is evaluated; no first-match-wins
//! - Empty result means no route; resolve itself never fails

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::chain::{Resolved, SharedHandler};
use crate::error::RegistrationError;
use crate::http::Request;
use crate::routing::entry::{RouteEntry, Target};
use crate::routing::matcher::{join, match_path, Verdict, WILDCARD};
use crate::routing::method::{Method, MethodPattern};

/// Where handlers of a mounted router land in the final chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveOrder {
    /// Strict registration order: nested handlers appear where the mount was
    /// registered.
    #[default]
    Registration,
    /// Nested handlers are put in front of everything matched so far at the
    /// mounting level, so later mounts run before earlier entries.
    NestedFirst,
}

/// A flattened view of one handler entry, for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteSummary {
    pub method: String,
    pub pattern: String,
    pub handler: String,
}

/// An ordered table of route entries.
#[derive(Debug, Clone, Default)]
pub struct Router {
    entries: Vec<RouteEntry>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register handlers under a method token (`*` for any) and a path pattern.
    pub fn route<I>(
        &mut self,
        method: &str,
        path: &str,
        handlers: I,
    ) -> Result<&mut Self, RegistrationError>
    where
        I: IntoIterator<Item = SharedHandler>,
    {
        let method: MethodPattern = method.parse()?;
        self.add(method, path, handlers)
    }

    /// Register handlers under an already parsed method pattern.
    ///
    /// Each handler becomes its own entry, in the order given.
    pub fn add<I>(
        &mut self,
        method: MethodPattern,
        path: &str,
        handlers: I,
    ) -> Result<&mut Self, RegistrationError>
    where
        I: IntoIterator<Item = SharedHandler>,
    {
        let entries = handlers
            .into_iter()
            .map(|h| RouteEntry::new(method, path, Target::Handler(h)))
            .collect::<Result<Vec<_>, _>>()?;

        if entries.is_empty() {
            return Err(RegistrationError::NoHandlers {
                method: method.to_string(),
                path: path.to_string(),
            });
        }

        self.entries.extend(entries);
        Ok(self)
    }

    pub fn get<I>(&mut self, path: &str, handlers: I) -> Result<&mut Self, RegistrationError>
    where
        I: IntoIterator<Item = SharedHandler>,
    {
        self.add(Method::Get.into(), path, handlers)
    }

    pub fn post<I>(&mut self, path: &str, handlers: I) -> Result<&mut Self, RegistrationError>
    where
        I: IntoIterator<Item = SharedHandler>,
    {
        self.add(Method::Post.into(), path, handlers)
    }

    pub fn options<I>(&mut self, path: &str, handlers: I) -> Result<&mut Self, RegistrationError>
    where
        I: IntoIterator<Item = SharedHandler>,
    {
        self.add(Method::Options.into(), path, handlers)
    }

    pub fn delete<I>(&mut self, path: &str, handlers: I) -> Result<&mut Self, RegistrationError>
    where
        I: IntoIterator<Item = SharedHandler>,
    {
        self.add(Method::Delete.into(), path, handlers)
    }

    pub fn head<I>(&mut self, path: &str, handlers: I) -> Result<&mut Self, RegistrationError>
    where
        I: IntoIterator<Item = SharedHandler>,
    {
        self.add(Method::Head.into(), path, handlers)
    }

    pub fn update<I>(&mut self, path: &str, handlers: I) -> Result<&mut Self, RegistrationError>
    where
        I: IntoIterator<Item = SharedHandler>,
    {
        self.add(Method::Update.into(), path, handlers)
    }

    /// Register handlers for every method.
    pub fn any<I>(&mut self, path: &str, handlers: I) -> Result<&mut Self, RegistrationError>
    where
        I: IntoIterator<Item = SharedHandler>,
    {
        self.add(MethodPattern::Any, path, handlers)
    }

    /// Register a catch-all middleware (`*` method, `*` path).
    pub fn middleware(&mut self, handler: SharedHandler) -> &mut Self {
        self.entries.push(RouteEntry::catch_all(Target::Handler(handler)));
        self
    }

    /// Mount a router under a path prefix, for all methods.
    ///
    /// The mounted router's patterns are relative to `prefix`.
    pub fn mount(&mut self, prefix: &str, router: Router) -> Result<&mut Self, RegistrationError> {
        let entry = RouteEntry::new(MethodPattern::Any, prefix, Target::Router(Arc::new(router)))?;
        self.entries.push(entry);
        Ok(self)
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve in registration order.
    pub fn resolve(&self, req: &Request) -> Vec<Resolved> {
        self.resolve_with(req, ResolveOrder::Registration)
    }

    /// Resolve the ordered handlers for `req`.
    pub fn resolve_with(&self, req: &Request, order: ResolveOrder) -> Vec<Resolved> {
        let resolved = self.resolve_at(req, "", order);
        tracing::debug!(
            request_id = %req.id(),
            method = %req.method(),
            path = %req.path(),
            handlers = resolved.len(),
            "Resolved handler chain"
        );
        resolved
    }

    fn resolve_at(&self, req: &Request, prefix: &str, order: ResolveOrder) -> Vec<Resolved> {
        let mut matched: Vec<Resolved> = Vec::new();

        for entry in &self.entries {
            if !entry.method().matches(req.method()) {
                continue;
            }

            let pattern = if entry.is_catch_all() {
                WILDCARD.to_string()
            } else {
                join(prefix, entry.path())
            };

            let result = match_path(&pattern, req.path());
            if !result.is_match() {
                continue;
            }

            match entry.target() {
                Target::Router(child) => {
                    let child_prefix = if entry.is_catch_all() { prefix } else { &pattern };
                    let nested = child.resolve_at(req, child_prefix, order);
                    match order {
                        ResolveOrder::Registration => matched.extend(nested),
                        ResolveOrder::NestedFirst => {
                            matched.splice(0..0, nested);
                        }
                    }
                }
                Target::Handler(handler) if result.verdict == Verdict::Full => {
                    matched.push(Resolved {
                        handler: handler.clone(),
                        params: result.params,
                    });
                }
                Target::Handler(_) => {}
            }
        }

        matched
    }

    /// Every handler entry in the tree with its full pattern, depth first.
    pub fn routes(&self) -> Vec<RouteSummary> {
        let mut out = Vec::new();
        self.collect_routes("", MethodPattern::Any, &mut out);
        out
    }

    fn collect_routes(&self, prefix: &str, inherited: MethodPattern, out: &mut Vec<RouteSummary>) {
        for entry in &self.entries {
            let pattern = if entry.is_catch_all() {
                if prefix.is_empty() {
                    WILDCARD.to_string()
                } else {
                    join(prefix, WILDCARD)
                }
            } else {
                join(prefix, entry.path())
            };
            let method = match entry.method() {
                MethodPattern::Any => inherited,
                exact => exact,
            };

            match entry.target() {
                Target::Handler(handler) => out.push(RouteSummary {
                    method: method.to_string(),
                    pattern,
                    handler: handler.name().to_string(),
                }),
                Target::Router(child) => {
                    let child_prefix = if entry.is_catch_all() { prefix } else { &pattern };
                    child.collect_routes(child_prefix, method, out);
                }
            }
        }
    }
}
