//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (walk entries in registration order)
//!     → matcher.rs (prefix + pattern against path)
//!     → method.rs (method pattern check)
//!     → handler entry, full match: append to chain
//!     → router entry, any match: recurse with the mount pattern as prefix
//!     → Return: ordered handlers (empty = no route)
//!
//! Route registration (at startup):
//!     route()/get()/mount()/middleware()
//!     → entry.rs (validate pattern, freeze entry)
//!     → Router shared via Arc by the dispatcher
//! ```
//!
//! # Design Decisions
//! - Routes built at startup, immutable at runtime
//! - No regex in hot path (segment walk only)
//! - Deterministic: same input always yields the same chain
//! - All matches contribute, ordered per `ResolveOrder`

pub mod entry;
pub mod matcher;
pub mod method;
pub mod router;

pub use entry::{RouteEntry, Target};
pub use matcher::{match_path, MatchResult, Params, Verdict};
pub use method::{Method, MethodPattern};
pub use router::{ResolveOrder, RouteSummary, Router};
